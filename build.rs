use std::env;
use std::fs;
use std::path::{Path, PathBuf};

// 前端未构建时写入的占位页，API 照常可用
const PLACEHOLDER_PAGE: &str = r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>ClassQuest</title>
    <style>
        body { font-family: system-ui, sans-serif; max-width: 560px; margin: 80px auto; text-align: center; }
        .note { background: #eef6ff; border: 1px solid #b6d4fe; border-radius: 8px; padding: 16px; }
        code { background: #f1f3f4; padding: 2px 6px; border-radius: 4px; }
    </style>
</head>
<body>
    <h1>ClassQuest</h1>
    <div class="note">
        <p>页面资源缺失，当前只提供 <code>/api/v1</code> 接口。</p>
        <p>构建页面：<code>cd frontend && bun install && bun run build</code></p>
    </div>
</body>
</html>"#;

fn main() {
    println!("cargo:rerun-if-changed=frontend/dist");

    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    let dist = PathBuf::from(manifest_dir).join("frontend/dist");

    if dist.join("index.html").exists() {
        return;
    }

    println!("cargo:warning=frontend/dist not found, embedding placeholder page");
    write_placeholder(&dist);
}

fn write_placeholder(dist: &Path) {
    fs::create_dir_all(dist.join("assets")).expect("Failed to create dist/assets");
    fs::write(dist.join("index.html"), PLACEHOLDER_PAGE).expect("Failed to write index.html");
    fs::write(dist.join("favicon.ico"), []).expect("Failed to write favicon.ico");
}
