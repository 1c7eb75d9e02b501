use chattest_core::credential::ApiKey;
use console::style;
use std::net::SocketAddr;
use std::path::Path;

pub fn present_error(error: anyhow::Error) {
    let error_text = style("ERROR:").red().bold();
    eprintln!("\n{error_text} {:#}", error);
}

/// Print the credential state before the server starts.
pub fn present_key_status(key: &ApiKey) {
    if key.is_present() {
        println!("{} {}", style("✓").green().bold(), key.startup_line());
        println!("Starting OpenAI Chat Tester...");
    } else {
        println!("{} {}", style("⚠").yellow().bold(), key.startup_line());
        println!("Starting anyway...");
    }
}

pub fn present_log_path(path: &Path) {
    println!("{}", style(format!("Logging to {}", path.display())).dim());
}

pub fn present_listening(addr: SocketAddr, model: &str) {
    println!(
        "{} http://{addr} {}",
        style("Listening on").bold(),
        style(format!("(model: {model})")).dim()
    );
}
