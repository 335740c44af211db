use std::path::PathBuf;

fn main() {
    let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap());
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let dist = manifest_dir.join("../../frontend/dist");

    println!("cargo:rerun-if-changed={}", dist.display());
    println!("cargo:rerun-if-env-changed=CCM_FRONTEND_DIST");

    // An explicit override wins (e.g. a dashboard built elsewhere).
    if let Ok(dir) = std::env::var("CCM_FRONTEND_DIST") {
        println!("cargo:rustc-env=CCM_FRONTEND_DIST={dir}");
        return;
    }

    if dist.join("index.html").exists() {
        println!("cargo:rustc-env=CCM_FRONTEND_DIST={}", dist.display());
        return;
    }

    // No dashboard checked out. Write a stub into OUT_DIR so the RustEmbed
    // proc-macro still has a folder to embed.
    let stub_dir = out_dir.join("frontend-dist");
    std::fs::create_dir_all(&stub_dir).expect("create stub frontend-dist dir");
    std::fs::write(
        stub_dir.join("index.html"),
        "<!doctype html><html><body>\
         <p>Dashboard assets missing. Restore <code>frontend/dist</code> and rebuild.</p>\
         </body></html>",
    )
    .expect("write stub index.html");
    println!("cargo:rustc-env=CCM_FRONTEND_DIST={}", stub_dir.display());
    println!("cargo:warning=frontend/dist not found, ccm-server will serve a stub UI");
}
