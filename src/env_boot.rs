use dotenv::dotenv;

/// Load `.env.local` first (it wins), then `.env`; if neither is present in the
/// working directory, try the project root.
pub fn ensure_dotenv() {
    let local = dotenv::from_filename(".env.local").is_ok();
    let shared = dotenv().is_ok();
    if local || shared {
        return;
    }
    // Fallback to Cargo project root
    let root = env!("CARGO_MANIFEST_DIR");
    let _ = dotenv::from_filename(format!("{}/.env.local", root));
    let _ = dotenv::from_filename(format!("{}/.env", root));
}
