//! Public site: server-rendered pages plus the contact form endpoint.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod render;
pub mod routes;
pub mod server;

pub use server::SiteServer;
