#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("This crate enhances a static page in the browser. Run `trunk serve` or `trunk build --release`.");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    page_enhancer::frontend::run();
}
