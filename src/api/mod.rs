// Operation facade
// The surface a presentation layer calls. Every operation takes `&AppState`,
// recovers all failures into the `ApiResponse` envelope, and never panics.

pub mod admin;
pub mod payment;
pub mod proposal;
pub mod quotes;
