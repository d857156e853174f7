pub mod banner;
pub mod tui;

/// Prints the welcome banner. Call once at startup (e.g. in main after
/// tracing init), before the first prompt.
pub fn init_ui() {
    banner::print_welcome();
}
