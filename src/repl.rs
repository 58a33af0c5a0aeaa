//! Interactive operator shell: one catalog operation at a time, parsed with
//! an embedded clap command set.

use crate::cli_style::{
    get_styles, print_error, print_key_value, print_success, print_warning, TableBuilder,
};
use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use rustyline::{
    completion::Completer, highlight::Highlighter, hint::Hinter, history::FileHistory,
    validate::Validator, CompletionType, Config, Editor, Helper,
};
use song_storage::catalog::{parse_release_date, parse_song_id, parse_tags};
use song_storage::config::AppConfig;
use song_storage::playback::{PlaybackOutcome, StopKeyWatcher};
use song_storage::{CancelToken, CatalogError, CatalogManager};
use std::path::PathBuf;

#[derive(Parser)]
#[command(styles = get_styles(), name = "")]
struct InnerCli {
    #[command(subcommand)]
    command: InnerCommand,
}

#[derive(Subcommand)]
enum InnerCommand {
    /// Copies a song file into the catalog and records its metadata.
    Add {
        /// Path of the audio file to add.
        path: PathBuf,
        #[clap(long)]
        artist: Option<String>,
        #[clap(long)]
        song_name: Option<String>,
        /// Release date as YYYY-MM-DD.
        #[clap(long)]
        release_date: Option<String>,
        /// Comma separated tag list.
        #[clap(long)]
        tags: Option<String>,
    },

    /// Deletes a song and its stored file.
    Delete { id: String },

    /// Updates metadata fields of a song, e.g. `modify 3 artist="New Name"`.
    Modify {
        id: String,
        /// field=value assignments (artist, song_name, release_date, tags).
        #[clap(required = true)]
        assignments: Vec<String>,
    },

    /// Lists songs matching an artist (exact) and file format (suffix).
    Search { artist: String, format: String },

    /// Exports all matching songs into a zip archive.
    Export {
        /// Destination path of the archive.
        path: PathBuf,
        artist: String,
        format: String,
    },

    /// Plays a song. Enter, Esc, q or Ctrl-C stops playback.
    Play { id: String },

    /// Shows the storage locations in use.
    Where,

    /// Close this program.
    Exit,
}

enum CommandExecutionResult {
    Ok,
    Exit,
    Error(String),
}

const PROMPT: &str = ">> ";

fn split_assignment(raw: &str) -> Result<(String, String), CatalogError> {
    match raw.split_once('=') {
        Some((field, value)) => Ok((field.trim().to_string(), value.to_string())),
        None => Err(CatalogError::UnknownField(raw.to_string())),
    }
}

fn print_entries(entries: &[song_storage::SongEntry]) {
    let mut table = TableBuilder::new(vec!["ID", "Artist", "Song", "Released", "File", "Tags"]);
    for entry in entries {
        let id = entry.id.to_string();
        let released = entry
            .release_date
            .map(|d| d.to_string())
            .unwrap_or_default();
        let tags = entry.tags.join(", ");
        table.add_row(vec![
            &id,
            entry.artist.as_deref().unwrap_or(""),
            entry.song_name.as_deref().unwrap_or(""),
            &released,
            &entry.file_name,
            &tags,
        ]);
    }
    table.print();
}

fn execute_command(
    line: String,
    manager: &mut CatalogManager,
    app_config: &AppConfig,
    interrupt: &CancelToken,
) -> CommandExecutionResult {
    if line.trim().is_empty() {
        return CommandExecutionResult::Ok;
    }

    let args =
        shlex::split(&line).unwrap_or_else(|| line.split_whitespace().map(String::from).collect());

    let cli = InnerCli::try_parse_from(std::iter::once(" ").chain(args.iter().map(String::as_str)));

    let cli = match cli {
        Ok(cli) => cli,
        Err(e) => {
            if e.print().is_err() {
                println!("{}", e);
            }
            return CommandExecutionResult::Ok;
        }
    };

    let outcome: Result<(), CatalogError> = match cli.command {
        InnerCommand::Add {
            path,
            artist,
            song_name,
            release_date,
            tags,
        } => {
            let release_date = match release_date.map(|raw| parse_release_date(&raw)).transpose() {
                Ok(date) => date,
                Err(err) => return CommandExecutionResult::Error(err.to_string()),
            };
            let tags = tags.map(|raw| parse_tags(&raw)).unwrap_or_default();
            manager
                .add_song(&path, artist, song_name, release_date, tags)
                .map(|id| print_success(&format!("Added song with id {}", id)))
        }

        InnerCommand::Delete { id } => parse_song_id(&id)
            .and_then(|id| manager.delete_song(id))
            .map(|_| print_success("Song deleted")),

        InnerCommand::Modify { id, assignments } => parse_song_id(&id)
            .and_then(|id| {
                let fields = assignments
                    .iter()
                    .map(|raw| split_assignment(raw))
                    .collect::<Result<Vec<_>, _>>()?;
                manager.modify_song(id, &fields)
            })
            .map(|_| print_success("Song updated")),

        InnerCommand::Search { artist, format } => {
            match manager.search_songs(&artist, &format) {
                Ok(entries) if entries.is_empty() => {
                    print_warning("No matching songs");
                    Ok(())
                }
                Ok(entries) => {
                    print_entries(&entries);
                    Ok(())
                }
                Err(err) => Err(err),
            }
        }

        InnerCommand::Export {
            path,
            artist,
            format,
        } => manager.create_savelist(&path, &artist, &format).map(|summary| {
            print_success(&format!(
                "Archived {} songs to {:?}",
                summary.archived.len(),
                summary.archive_path
            ));
            if !summary.missing.is_empty() {
                print_warning(&format!(
                    "{} stored files were missing and skipped: {}",
                    summary.missing.len(),
                    summary.missing.join(", ")
                ));
            }
        }),

        InnerCommand::Play { id } => match parse_song_id(&id) {
            Ok(id) => {
                interrupt.reset();
                println!("Playing... press Enter, Esc or q to stop.");
                let watcher = StopKeyWatcher::spawn(interrupt.clone());
                let result = manager.play_song(id, interrupt);
                drop(watcher);
                result.map(|outcome| match outcome {
                    PlaybackOutcome::Completed => print_success("Playback finished"),
                    PlaybackOutcome::Cancelled => print_warning("Playback stopped"),
                })
            }
            Err(err) => Err(err),
        },

        InnerCommand::Where => {
            print_key_value("Database", &app_config.db_path.display().to_string());
            print_key_value(
                "Content store",
                &app_config.storage_dir.display().to_string(),
            );
            match manager.song_count() {
                Ok(count) => {
                    print_key_value("Songs", &count.to_string());
                    Ok(())
                }
                Err(err) => Err(err),
            }
        }

        InnerCommand::Exit => return CommandExecutionResult::Exit,
    };

    match outcome {
        Ok(()) => CommandExecutionResult::Ok,
        Err(err) => CommandExecutionResult::Error(err.to_string()),
    }
}

struct ReplHelper {
    commands_names: Vec<String>,
}

impl ReplHelper {
    pub fn new() -> Self {
        let commands_names: Vec<String> = InnerCli::command()
            .get_subcommands()
            .map(|sc| sc.get_name().to_string())
            .collect();

        ReplHelper { commands_names }
    }
}

impl Completer for ReplHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        if line.contains(' ') {
            return Ok((0, Vec::with_capacity(0)));
        }
        let matches = self
            .commands_names
            .iter()
            .filter(|c| c.starts_with(line))
            .map(|c| c.to_string())
            .collect::<Vec<_>>();

        Ok((0, matches))
    }
}

impl Hinter for ReplHelper {
    type Hint = String;
}
impl Highlighter for ReplHelper {}
impl Validator for ReplHelper {}
impl Helper for ReplHelper {}

pub fn run(
    manager: &mut CatalogManager,
    app_config: &AppConfig,
    interrupt: CancelToken,
) -> Result<()> {
    InnerCli::command().print_long_help()?;

    let config = Config::builder()
        .completion_type(CompletionType::List)
        .build();

    let mut rl = Editor::<ReplHelper, FileHistory>::with_config(config)?;
    rl.set_helper(Some(ReplHelper::new()));

    loop {
        let readline = rl.readline(PROMPT);

        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                match execute_command(line, manager, app_config, &interrupt) {
                    CommandExecutionResult::Ok => {}
                    CommandExecutionResult::Exit => {
                        break;
                    }
                    CommandExecutionResult::Error(err) => {
                        print_error(&err);
                        continue;
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("CTRL-D: exiting.");
                break;
            }
            Err(e) => {
                println!("Error: {:?}", e);
                break;
            }
        }
    }
    Ok(())
}
