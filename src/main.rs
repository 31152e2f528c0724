//! flextracker main entrypoint.

use flextracker::run;
use flextracker::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
