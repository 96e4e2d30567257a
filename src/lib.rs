//! Data and render pipeline behind the deadline home-screen widgets.
//!
//! host app → [`store`] → [`refresh`] → [`model`] → [`widget`] → surface

pub mod config;
pub mod deadline;
pub mod model;
pub mod refresh;
pub mod store;
pub mod subject;
pub mod theme;
pub mod widget;
