use std::path::Path;

use anyhow::Context;
use clap::ValueEnum;
use vitrina_core::models::{
    BlogCategory, BlogPost, MultimediaCategory, MultimediaFile, MultimediaStats, UploadFileRequest,
};
use vitrina_core::validation::format_file_size;
use vitrina_core::{Page, PageInfo};
use vitrina_services::{UploadRecord, UploadStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Split a comma-separated argument, dropping blanks.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// `[#####.....]  50%`
pub fn progress_bar(percent: u8, width: usize) -> String {
    let percent = percent.min(100);
    let filled = width * usize::from(percent) / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        ".".repeat(width - filled),
        percent
    )
}

/// Read a local file into an upload request, guessing its MIME type from the
/// extension (`application/octet-stream` when unknown).
pub async fn read_upload(
    path: &Path,
    category: Option<MultimediaCategory>,
    tags: &[String],
    description: &Option<String>,
    alt: &Option<String>,
) -> anyhow::Result<UploadFileRequest> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("Not a file path: {}", path.display()))?;
    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    tracing::debug!(file = %file_name, mime_type = %mime_type, size = data.len(), "Read upload");

    let mut request = UploadFileRequest::new(file_name, mime_type, data);
    request.category = category;
    request.tags = tags.to_vec();
    request.description = description.clone();
    request.alt = alt.clone();
    Ok(request)
}

pub fn upload_line(record: &UploadRecord) -> String {
    let name = truncate_string(&record.file_name, 30);
    match &record.status {
        UploadStatus::Uploading => format!("{:<30} {}", name, progress_bar(record.progress, 20)),
        UploadStatus::Completed => format!("{:<30} {} done", name, progress_bar(100, 20)),
        UploadStatus::Error(message) => format!("{:<30} failed: {}", name, message),
    }
}

pub fn print_files_table(files: &[MultimediaFile], info: &PageInfo) {
    println!("\n=== Multimedia ===\n");
    println!(
        "Total: {} files (page {} of {})",
        info.total,
        info.page,
        info.total_pages.max(1)
    );

    if files.is_empty() {
        println!("\nNo files found.");
        return;
    }

    println!(
        "\n{:<26} {:<9} {:<30} {:<24} {:>10} {:>17}",
        "ID", "Category", "Filename", "Tags", "Size", "Created At"
    );
    println!("{}", "-".repeat(121));

    for file in files {
        println!(
            "{:<26} {:<9} {:<30} {:<24} {:>10} {:>17}",
            truncate_string(&file.id, 26),
            file.category,
            truncate_string(&file.filename, 30),
            truncate_string(&file.tags.join(", "), 24),
            format_file_size(file.size),
            file.created_at.format("%Y-%m-%d %H:%M")
        );
    }

    if info.has_next_page {
        println!("\nMore files on page {} (use --page).", info.page + 1);
    }
}

pub fn print_stats(stats: &MultimediaStats) {
    println!("\n=== Multimedia Stats ===\n");
    println!("Files: {}", stats.total_files);
    println!("Size:  {}", format_file_size(stats.total_size));

    if stats.by_category.is_empty() {
        return;
    }
    println!("\n{:<10} {:>8} {:>12}", "Category", "Files", "Size");
    println!("{}", "-".repeat(32));
    for entry in &stats.by_category {
        println!(
            "{:<10} {:>8} {:>12}",
            entry.category,
            entry.count,
            format_file_size(entry.size)
        );
    }
}

pub fn print_posts_table(page: &Page<BlogPost>) {
    println!("\n=== Noticias ===\n");
    println!(
        "Total: {} posts (page {} of {})",
        page.total,
        page.page,
        page.total_pages.max(1)
    );

    if page.data.is_empty() {
        println!("\nNo posts found.");
        return;
    }

    println!(
        "\n{:<12} {:<36} {:<18} {:<10} {:>12}",
        "ID", "Title", "Category", "Status", "Date"
    );
    println!("{}", "-".repeat(92));

    for post in &page.data {
        let status = if post.is_published { "published" } else { "draft" };
        println!(
            "{:<12} {:<36} {:<18} {:<10} {:>12}",
            truncate_string(&post.id, 12),
            truncate_string(&post.title, 36),
            truncate_string(&post.category, 18),
            status,
            post.sort_date().format("%Y-%m-%d")
        );
    }
}

pub fn print_post(post: &BlogPost) {
    println!("\n{}\n{}", post.title, "=".repeat(post.title.chars().count()));
    println!("slug:      {}", post.slug);
    println!("category:  {}", post.category);
    if let Some(author) = &post.author {
        println!("author:    {}", author);
    }
    if !post.tags.is_empty() {
        println!("tags:      {}", post.tags.join(", "));
    }
    match post.published_at {
        Some(at) if post.is_published => println!("published: {}", at.format("%Y-%m-%d %H:%M")),
        _ => println!("status:    draft"),
    }
    if !post.excerpt.is_empty() {
        println!("\n{}", post.excerpt);
    }
    println!("\n{}", post.content);
}

pub fn print_categories(categories: &[BlogCategory]) {
    if categories.is_empty() {
        println!("No categories.");
        return;
    }
    println!("{:<24} {:<24} {:<9} {:>6}", "Name", "Slug", "Color", "Posts");
    println!("{}", "-".repeat(66));
    for category in categories {
        println!(
            "{:<24} {:<24} {:<9} {:>6}",
            truncate_string(&category.name, 24),
            truncate_string(&category.slug, 24),
            category.color,
            category.post_count
        );
    }
}

/// Initialize tracing for the CLI. Logs go to stderr so JSON output stays clean.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
