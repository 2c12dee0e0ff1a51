pub mod form;
pub mod requests;
pub mod responses;
pub mod state;
