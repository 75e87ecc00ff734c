// Only compile the browser when the TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;

fn main() -> Result<()> {
    run_browser()
}

#[cfg(feature = "tui")]
fn run_browser() -> Result<()> {
    use arm_maker::TemplateModel;
    use std::cell::RefCell;
    use std::rc::Rc;

    println!("🖥️  Loading ARM Maker...\n");
    println!("Starting UI... (Press 'q' to quit)\n");

    // Construct model, then window, then run the event loop.
    let model = Rc::new(RefCell::new(TemplateModel::new()));
    let mut browser = ui::Browser::new(model);
    ui::run_ui(&mut browser)?;

    println!("\n✅ Browser closed");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_browser() -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    std::process::exit(1);
}
