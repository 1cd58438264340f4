//! Vitrina CLI: command-line client for the Vitrina CMS backend.
//!
//! Configure with VITRINA_API_URL (or API_URL). Authenticate with
//! `vitrina login --token <token>` or VITRINA_TOKEN.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use vitrina_api_client::{ApiClient, BlogApi, FileTokenStore, MultimediaApi};
use vitrina_cli::{
    init_tracing, parse_list, print_categories, print_files_table, print_post, print_posts_table,
    print_stats, read_upload, upload_line, OutputFormat,
};
use vitrina_core::models::{
    BlogFilters, BlogPostInput, BlogSortField, MultimediaCategory, MultimediaFilters,
    MultimediaSortField, PublishStatus, SortOrder, UpdateMultimediaRequest, UploadFileRequest,
};
use vitrina_core::slug::generate_slug;
use vitrina_core::ClientConfig;
use vitrina_services::{BlogStore, MediaLibrary, MediaLibraryOptions};

#[derive(Parser)]
#[command(name = "vitrina", about = "Vitrina CMS command-line client")]
struct Cli {
    /// Output format
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Multimedia library operations
    Media {
        #[command(subcommand)]
        sub: MediaCommands,
    },
    /// Blog (noticias) operations
    Blog {
        #[command(subcommand)]
        sub: BlogCommands,
    },
    /// Store an auth token for later commands
    Login {
        #[arg(long)]
        token: String,
    },
    /// Remove the stored auth token
    Logout,
}

#[derive(Subcommand)]
enum MediaCommands {
    /// List files with optional filters and pagination
    List {
        /// Free-text search
        #[arg(long)]
        search: Option<String>,
        /// Filter by category: image, video, svg, document
        #[arg(long)]
        category: Option<MultimediaCategory>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
        /// Sort field: created_at, filename, size, category
        #[arg(long, default_value = "created_at")]
        sort: MultimediaSortField,
        /// Sort order: asc or desc
        #[arg(long, default_value = "desc")]
        order: SortOrder,
        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: u32,
        /// Files per page (defaults to VITRINA_PAGE_SIZE)
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Upload one or more files, one after another
    Upload {
        /// Paths of the files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Override the category derived from the MIME type
        #[arg(long)]
        category: Option<MultimediaCategory>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        alt: Option<String>,
    },
    /// Update file metadata
    Update {
        id: String,
        #[arg(long)]
        filename: Option<String>,
        #[arg(long)]
        category: Option<MultimediaCategory>,
        /// Comma-separated tags; replaces the current set
        #[arg(long)]
        tags: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        alt: Option<String>,
    },
    /// Delete a file by ID
    Delete { id: String },
    /// Delete several files in one request
    BulkDelete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// List every tag in use
    Tags,
    /// Library statistics
    Stats,
}

#[derive(Subcommand)]
enum BlogCommands {
    /// List posts with filters and pagination
    List {
        #[arg(long)]
        search: Option<String>,
        /// published or draft
        #[arg(long)]
        status: Option<PublishStatus>,
        #[arg(long)]
        category: Option<String>,
        /// Comma-separated tags; posts must carry all of them
        #[arg(long)]
        tags: Option<String>,
        /// Sort field: date, title, author
        #[arg(long, default_value = "date")]
        sort: BlogSortField,
        #[arg(long, default_value = "desc")]
        order: SortOrder,
        #[arg(long, default_value = "1")]
        page: usize,
        /// Show the public listing (published only, newest first)
        #[arg(long)]
        public: bool,
    },
    /// Show a post by slug
    Show {
        slug: String,
        /// Only resolve published posts
        #[arg(long)]
        public: bool,
    },
    /// Create a post
    Create {
        #[arg(long)]
        title: String,
        /// Defaults to a slug generated from the title
        #[arg(long)]
        slug: Option<String>,
        #[arg(long, default_value = "")]
        excerpt: String,
        #[arg(long, conflicts_with = "content_file")]
        content: Option<String>,
        /// Read the body from a file
        #[arg(long)]
        content_file: Option<PathBuf>,
        #[arg(long)]
        category: String,
        #[arg(long)]
        tags: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        featured_image: Option<String>,
        /// Publish immediately
        #[arg(long)]
        publish: bool,
    },
    /// Publish a post
    Publish { id: String },
    /// Move a post back to draft
    Unpublish { id: String },
    /// Delete a post
    Delete { id: String },
    /// Categories derived from the posts
    Categories,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

async fn run_uploads(
    library: &MediaLibrary,
    requests: Vec<UploadFileRequest>,
) -> anyhow::Result<Vec<vitrina_core::models::MultimediaFile>> {
    let render = |library: &MediaLibrary| {
        let mut stderr = std::io::stderr().lock();
        for record in library.uploads() {
            let _ = writeln!(stderr, "{}", upload_line(&record));
        }
    };

    let upload = library.upload_files(requests);
    tokio::pin!(upload);
    let mut ticker = tokio::time::interval(Duration::from_millis(250));
    let result = loop {
        tokio::select! {
            result = &mut upload => break result,
            _ = ticker.tick() => render(library),
        }
    };
    render(library);

    match result {
        Ok(files) => Ok(files),
        Err(err) => {
            let message = library.error().unwrap_or_else(|| err.to_string());
            Err(anyhow::Error::new(err).context(message))
        }
    }
}

async fn run_media(
    client: ApiClient,
    config: &ClientConfig,
    format: OutputFormat,
    command: MediaCommands,
) -> anyhow::Result<()> {
    let api: Arc<dyn MultimediaApi> = Arc::new(client);
    let library = MediaLibrary::new(api, MediaLibraryOptions::from_config(config));

    match command {
        MediaCommands::List {
            search,
            category,
            tags,
            sort,
            order,
            page,
            limit,
        } => {
            let filters = MultimediaFilters {
                search: search.unwrap_or_default(),
                category,
                tags: tags.as_deref().map(parse_list).unwrap_or_default(),
                sort_field: sort,
                sort_order: order,
                page: page.max(1),
                limit: limit.unwrap_or(config.page_size).max(1),
            };
            library
                .replace_filters(filters)
                .await
                .context("Error al cargar archivos")?;
            let state = library.snapshot();
            match format {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "data": state.files,
                    "pagination": state.page_info,
                }))?,
                OutputFormat::Table => print_files_table(&state.files, &state.page_info),
            }
        }
        MediaCommands::Upload {
            files,
            category,
            tags,
            description,
            alt,
        } => {
            let tags = tags.as_deref().map(parse_list).unwrap_or_default();
            let mut requests = Vec::with_capacity(files.len());
            for path in &files {
                requests.push(read_upload(path, category, &tags, &description, &alt).await?);
            }
            let uploaded = run_uploads(&library, requests).await?;
            tracing::info!(count = uploaded.len(), "Uploaded files");
            match format {
                OutputFormat::Json => print_json(&uploaded)?,
                OutputFormat::Table => {
                    for file in &uploaded {
                        println!("{}  {}", file.id, file.url);
                    }
                }
            }
        }
        MediaCommands::Update {
            id,
            filename,
            category,
            tags,
            description,
            alt,
        } => {
            let patch = UpdateMultimediaRequest {
                filename,
                category,
                tags: tags.as_deref().map(parse_list),
                description,
                alt,
            };
            if patch.is_empty() {
                bail!("Nothing to update: pass at least one of --filename, --category, --tags, --description, --alt");
            }
            let updated = library.update_file(&id, patch).await?;
            tracing::info!(file_id = %id, "Updated file metadata");
            print_json(&updated)?;
        }
        MediaCommands::Delete { id } => {
            library.delete_file(&id).await?;
            tracing::info!(file_id = %id, "Deleted file");
            print_json(&serde_json::json!({ "success": true, "message": format!("File {} deleted", id) }))?;
        }
        MediaCommands::BulkDelete { ids } => {
            library.delete_files(&ids).await?;
            tracing::info!(count = ids.len(), "Deleted files");
            print_json(&serde_json::json!({ "success": true, "deleted": ids.len() }))?;
        }
        MediaCommands::Tags => {
            let tags = library.load_tags().await?;
            match format {
                OutputFormat::Json => print_json(&tags)?,
                OutputFormat::Table => {
                    for tag in tags {
                        println!("{}", tag);
                    }
                }
            }
        }
        MediaCommands::Stats => {
            let stats = library.load_stats().await?;
            match format {
                OutputFormat::Json => print_json(&stats)?,
                OutputFormat::Table => print_stats(&stats),
            }
        }
    }

    Ok(())
}

async fn run_blog(
    client: ApiClient,
    format: OutputFormat,
    command: BlogCommands,
) -> anyhow::Result<()> {
    let api: Arc<dyn BlogApi> = Arc::new(client);
    let store = BlogStore::new(api);
    store
        .load_posts()
        .await
        .context("Error al cargar noticias")?;

    match command {
        BlogCommands::List {
            search,
            status,
            category,
            tags,
            sort,
            order,
            page,
            public,
        } => {
            let page = if public {
                store.public_page(page)
            } else {
                store.set_filters(BlogFilters {
                    search: search.unwrap_or_default(),
                    status,
                    category,
                    tags: tags.as_deref().map(parse_list).unwrap_or_default(),
                    sort_by: sort,
                    sort_order: order,
                });
                store.page(page)
            };
            match format {
                OutputFormat::Json => print_json(&page)?,
                OutputFormat::Table => print_posts_table(&page),
            }
        }
        BlogCommands::Show { slug, public } => {
            let post = if public {
                store.find_published(&slug)
            } else {
                store.find_by_slug(&slug)
            };
            let Some(post) = post else {
                bail!("No post with slug '{}'", slug);
            };
            match format {
                OutputFormat::Json => print_json(&post)?,
                OutputFormat::Table => print_post(&post),
            }
        }
        BlogCommands::Create {
            title,
            slug,
            excerpt,
            content,
            content_file,
            category,
            tags,
            author,
            featured_image,
            publish,
        } => {
            let content = match (content, content_file) {
                (Some(content), _) => content,
                (None, Some(path)) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                (None, None) => String::new(),
            };
            let input = BlogPostInput {
                slug: slug.unwrap_or_else(|| generate_slug(&title)),
                title,
                excerpt,
                content,
                featured_image,
                author,
                category,
                tags: tags.as_deref().map(parse_list).unwrap_or_default(),
                is_published: publish,
                published_at: None,
            };
            let post = store.save_post(None, input).await.map_err(|err| {
                let message = store.error().unwrap_or_else(|| err.to_string());
                anyhow::Error::new(err).context(message)
            })?;
            tracing::info!(post_id = %post.id, slug = %post.slug, "Created post");
            print_json(&post)?;
        }
        BlogCommands::Publish { id } => {
            let post = store.set_published(&id, true).await?;
            print_json(&post)?;
        }
        BlogCommands::Unpublish { id } => {
            let post = store.set_published(&id, false).await?;
            print_json(&post)?;
        }
        BlogCommands::Delete { id } => {
            store.delete_post(&id).await?;
            tracing::info!(post_id = %id, "Deleted post");
            print_json(&serde_json::json!({ "success": true, "message": format!("Post {} deleted", id) }))?;
        }
        BlogCommands::Categories => {
            let categories = store.categories();
            match format {
                OutputFormat::Json => print_json(&categories)?,
                OutputFormat::Table => print_categories(&categories),
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = ClientConfig::from_env()
        .context("Invalid configuration. Check VITRINA_API_URL (or API_URL) and VITRINA_* settings")?;

    match cli.command {
        Commands::Login { token } => {
            let store = FileTokenStore::new(config.token_file.clone());
            store.save(&token).context("Failed to store token")?;
            tracing::debug!(path = %store.path().display(), "Stored API token");
            println!("Token saved to {}", store.path().display());
        }
        Commands::Logout => {
            let store = FileTokenStore::new(config.token_file.clone());
            store.clear().context("Failed to remove token")?;
            tracing::debug!(path = %store.path().display(), "Removed API token");
            println!("Logged out");
        }
        Commands::Media { sub } => {
            let client = ApiClient::from_config(&config).context("Failed to create API client")?;
            run_media(client, &config, cli.format, sub).await?;
        }
        Commands::Blog { sub } => {
            let client = ApiClient::from_config(&config).context("Failed to create API client")?;
            run_blog(client, cli.format, sub).await?;
        }
    }

    Ok(())
}
