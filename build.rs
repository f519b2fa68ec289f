use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=ico/app.ico");

    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("windows") {
        return;
    }

    if !Path::new("ico/app.ico").is_file() {
        println!("cargo:warning=No icon found at ico/app.ico; exe icon resource not set");
        return;
    }

    let mut res = winres::WindowsResource::new();
    res.set_icon("ico/app.ico");
    res.set("ProductName", "QuickDeck");
    res.set("FileDescription", "QuickDeck launcher panel");
    res.set("OriginalFilename", "quickdeck.exe");
    res.set("InternalName", "quickdeck");
    if let Err(err) = res.compile() {
        panic!("failed to compile Windows resource icon: {err}");
    }
}
