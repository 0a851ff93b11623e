pub mod context;
pub mod handlers;
pub mod pipeline;
pub mod protocol;
pub mod routes;
pub mod session_cookie;
pub mod state;
pub mod views;
