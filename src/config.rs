use std::env;

/// What a manual booking does when its room number has no room row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissingRoomPolicy {
    /// Book anyway and price the stay at zero.
    ZeroPrice,
    /// Refuse the booking with a not-found error.
    Reject,
}

impl MissingRoomPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "zero" | "zero_price" => Some(MissingRoomPolicy::ZeroPrice),
            "reject" => Some(MissingRoomPolicy::Reject),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    pub admin_username: String,
    pub admin_password: String,
    pub missing_room_policy: MissingRoomPolicy,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: env::var("DATABASE_URL")
                .expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET")
                .expect("JWT_SECRET must be set"),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .expect("JWT_EXPIRATION_HOURS must be a number"),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            admin_username: env::var("ADMIN_USERNAME")
                .unwrap_or_else(|_| "admin".to_string()),
            admin_password: env::var("ADMIN_PASSWORD")
                .unwrap_or_else(|_| "admin123".to_string()),
            missing_room_policy: MissingRoomPolicy::parse(
                &env::var("MISSING_ROOM_PRICE_POLICY").unwrap_or_else(|_| "zero".to_string()),
            )
            .expect("MISSING_ROOM_PRICE_POLICY must be 'zero' or 'reject'"),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
