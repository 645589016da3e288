pub mod api_token;
pub mod middleware;

pub use api_token::ApiTokenValidator;
pub use middleware::auth_middleware;
