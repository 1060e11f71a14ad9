//! Renderers
//!
//! Turn API records into HTML fragments. Rendering is pure: no network and
//! no session access.

mod cards;
pub mod html;
mod time;

pub use cards::{
    render_caregiver, render_caregiver_list, render_medication, render_medication_list,
    render_profile,
};
pub use html::{escape, Container, Element, Node};
pub use time::format_time_12h;
