mod layout;
mod widgets;

pub use layout::render;
pub use widgets::{
    render_backlinks_panel,
    render_header,
    render_outline,
    render_slash_menu,
    render_status_bar,
    render_task_drawer,
};
