pub mod rest;
pub mod state;

// Re-export the handlers the binary wires into the router.
pub use rest::{
    add_section_handler, clear_image_handler, close_session_handler, get_session_handler,
    image_preview_handler, list_pages_handler, move_section_handler, open_session_handler,
    remove_section_handler, save_session_handler, stage_image_handler, update_section_handler,
};
