pub mod admin_routes;
pub mod auth_routes;
pub mod matatu_routes;
pub mod route_routes;
