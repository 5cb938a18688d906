// Tue Jan 13 2026 - Alex

use sigmatch::ui::Status;

fn main() {
    if let Err(e) = sigmatch::ui::cli::run() {
        Status::default().error(format!("{:#}", e));
        std::process::exit(1);
    }
}
