use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use spdlog::{info, warn};

use folder_posts::config::Config;
use folder_posts::document::Document;
use folder_posts::hooks::FolderPosts;
use folder_posts::logger::{configure_logger, ConsoleStream};
use folder_posts::meta::Metadata;
use folder_posts::util::parent_dir_name;

use crate::config::open_config;
use crate::config_data::{sample_cfg, write_sample_cfg};

mod config;
mod config_data;

const CFG_FILE_NAME: &str = "folder_posts.toml";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config path
    #[arg(short, long)]
    config_path: Option<String>,

    /// Site source directory, overrides the config file
    #[arg(short, long)]
    source: Option<String>,

    /// Output directory, overrides the config file
    #[arg(short, long)]
    destination: Option<String>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lists the folder posts and their resolved metadata
    Scan {
        /// Prints the posts as JSON
        #[arg(long)]
        json: bool,
    },
    /// Prints the body of one folder post with its image links rewritten
    Render {
        /// Post folder name, e.g. 2024-03-01-hello-world
        folder: String,
    },
    /// Copies the pic/ files of every post folder into the destination
    Assets,
    /// Writes a sample configuration file, or prints it without a path
    SampleConfig {
        out_file: Option<String>,
    },
}

#[derive(Serialize)]
struct PostSummary<'a> {
    path: String,
    title: Option<String>,
    date: Option<String>,
    slug: Option<String>,
    layout: Option<String>,
    tags: Vec<String>,
    categories: Vec<String>,
    data: &'a Metadata,
}

impl<'a> From<&'a Document> for PostSummary<'a> {
    fn from(doc: &'a Document) -> Self {
        PostSummary {
            path: doc.path.display().to_string(),
            title: doc.title(),
            date: doc.date().map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string()),
            slug: doc.slug(),
            layout: doc.layout(),
            tags: doc.tags(),
            categories: doc.categories(),
            data: &doc.data,
        }
    }
}

fn read_posts(plugin: &FolderPosts) -> Vec<Document> {
    let mut posts: Vec<Document> = vec![];
    plugin.post_read(&mut posts);
    posts
}

fn scan_output(posts: &[Document], json: bool) -> Result<String> {
    if json {
        let summaries: Vec<PostSummary> = posts.iter().map(PostSummary::from).collect();
        return Ok(serde_json::to_string_pretty(&summaries)?);
    }
    let lines: Vec<String> = posts.iter().map(|post| post.to_string()).collect();
    Ok(lines.join("\n"))
}

fn scan_cmd(plugin: &FolderPosts, json: bool) -> Result<()> {
    let posts = read_posts(plugin);
    println!("{}", scan_output(&posts, json)?);
    Ok(())
}

fn render_cmd(plugin: &FolderPosts, folder: &str) -> Result<()> {
    let mut posts = read_posts(plugin);
    let post = posts.iter_mut()
        .find(|post| parent_dir_name(&post.path).as_deref() == Some(folder))
        .ok_or_else(|| anyhow!("No folder post found for {}", folder))?;

    plugin.pre_render(post);
    println!("{}", post.content);
    Ok(())
}

fn assets_cmd(plugin: &FolderPosts) -> Result<()> {
    let posts = read_posts(plugin);
    let copied = plugin.post_write(&posts)?;
    println!("{} assets copied", copied);
    Ok(())
}

fn run(args: Args) -> Result<()> {
    if let Command::SampleConfig { out_file } = &args.command {
        match out_file {
            Some(path) => {
                write_sample_cfg(&PathBuf::from(path))?;
                println!("Sample config written to {}", path);
            }
            None => print!("{}", sample_cfg()),
        }
        return Ok(());
    }

    // stdout carries the JSON document, so every log line goes to stderr
    let console = match &args.command {
        Command::Scan { json: true } => ConsoleStream::Stderr,
        _ => ConsoleStream::Split,
    };
    if let Err(err) = configure_logger(None, args.verbose, console) {
        eprintln!("Error creating console logger. Desc={}", err);
    }

    let config: Config = open_config(
        args.config_path.map(PathBuf::from),
        args.source.map(PathBuf::from),
        args.destination.map(PathBuf::from),
    )?;

    if let Err(err) = configure_logger(config.log.as_ref(), args.verbose, console) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }
    info!("Posts from {}, output to {}", config.posts_root().display(), config.paths.destination.display());

    let plugin = FolderPosts::new(&config);
    match args.command {
        Command::Scan { json } => scan_cmd(&plugin, json),
        Command::Render { folder } => render_cmd(&plugin, &folder),
        Command::Assets => assets_cmd(&plugin),
        Command::SampleConfig { .. } => Ok(()),
    }
}

fn main() {
    let args = Args::parse();

    if let Err(err) = run(args) {
        eprintln!("{:#}", err);
        eprintln!("Please run folder-posts --help");
        std::process::exit(1);
    }
}
