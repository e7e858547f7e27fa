//! Terminal output for the client.

use std::io::Write;

/// Prompt shown while waiting for input
pub fn prompt(username: &str) -> String {
    format!("{}> ", username)
}

pub fn print_connected(username: &str) {
    println!(
        "\nConnected as '{}', start typing and chatting now. Press Ctrl+D to exit.\n",
        username
    );
}

/// Print a received chat line and redisplay the prompt below it
pub fn print_incoming(text: &str, prompt: &str) {
    print!("\r{}\n{}", text, prompt);
    std::io::stdout().flush().ok();
}

pub fn print_closed() {
    println!("\nConnection closed.");
}

pub fn print_unreachable() {
    println!("Failed to connect to server, please check your network and ensure server is running");
}
