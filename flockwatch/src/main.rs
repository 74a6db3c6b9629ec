//! Entry point for the flockwatch TUI. Parses args, resolves the profile and runs the App.

use flockwatch::app::App;
use flockwatch::demo::{spawn_demo_feed, DemoConfig};
use flockwatch::profiles::{load_profiles, save_profiles, ProfileEntry, ProfileRequest, ResolveProfile};
use flockwatch::{logging, ws};
use rand::{rngs::StdRng, SeedableRng};
use std::env;
use std::io::{self, Write};
use tokio::sync::mpsc;
use tracing::info;

// Burst headroom between the reader task and the dashboard loop.
const CHANNEL_DEPTH: usize = 256;

#[derive(Debug, Default, PartialEq)]
struct ParsedArgs {
    url: Option<String>,
    tls_ca: Option<String>,
    profile: Option<String>,
    save: bool,
    demo: bool,
    seed: Option<u64>,
    dry_run: bool,
}

fn usage(prog: &str) -> String {
    format!(
        "Usage: {prog} [--tls-ca CERT_PEM|-t CERT_PEM] [--profile NAME|-P NAME] [--save] [--demo] [--seed N] [--dry-run] [http://HOST:PORT | ws://HOST:PORT/socket.io/]\n\
         https/wss URLs trust the bundled web PKI roots; --tls-ca trusts only the given CA instead."
    )
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<ParsedArgs, String> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "flockwatch".into());
    let mut parsed = ParsedArgs::default();

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err(usage(&prog)),
            "--tls-ca" | "-t" => parsed.tls_ca = it.next(),
            "--profile" | "-P" => parsed.profile = it.next(),
            "--save" => parsed.save = true,
            "--demo" => parsed.demo = true,
            "--dry-run" => parsed.dry_run = true,
            "--seed" => {
                let v = it.next().unwrap_or_default();
                parsed.seed = Some(v.parse().map_err(|_| format!("invalid --seed {v:?}\n{}", usage(&prog)))?);
            }
            _ if arg.starts_with("--tls-ca=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        parsed.tls_ca = Some(v.to_string());
                    }
                }
            }
            _ if arg.starts_with("--profile=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        parsed.profile = Some(v.to_string());
                    }
                }
            }
            _ => {
                if parsed.url.is_none() {
                    parsed.url = Some(arg);
                } else {
                    return Err(format!("Unexpected argument. {}", usage(&prog)));
                }
            }
        }
    }
    Ok(parsed)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let parsed = match parse_args(env::args()) {
        Ok(v) => v,
        Err(msg) => {
            eprintln!("{msg}");
            return Ok(());
        }
    };

    match logging::init() {
        Ok(path) => info!(log = %path.display(), "flockwatch starting"),
        Err(e) => eprintln!("logging disabled: {e:#}"),
    }

    // Demo mode short-circuit (ignore other args except conflicting ones)
    if parsed.demo || matches!(parsed.profile.as_deref(), Some("demo")) {
        if parsed.dry_run {
            return Ok(());
        }
        return run_demo_mode(parsed.seed).await;
    }

    let profiles_file = load_profiles();
    let req = ProfileRequest {
        profile_name: parsed.profile.clone(),
        url: parsed.url.clone(),
        tls_ca: parsed.tls_ca.clone(),
    };
    let resolved = req.resolve(&profiles_file);

    // Determine final connection parameters (and maybe mutated profiles to persist)
    let mut profiles_mut = profiles_file.clone();
    let (url, tls_ca): (String, Option<String>) = match resolved {
        ResolveProfile::Direct(u, t) => {
            if let Some(name) = parsed.profile.as_ref() {
                let entry = ProfileEntry {
                    url: u.clone(),
                    tls_ca: t.clone(),
                };
                let write = match profiles_mut.profiles.get(name) {
                    // New profile: auto-save immediately
                    None => true,
                    Some(existing) if *existing != entry => {
                        parsed.save
                            || prompt_yes_no(&format!(
                                "Overwrite existing profile '{name}'? [y/N]: "
                            ))
                    }
                    Some(_) => false,
                };
                if write {
                    profiles_mut.profiles.insert(name.clone(), entry);
                    if let Err(e) = save_profiles(&profiles_mut) {
                        eprintln!("could not save profile '{name}': {e}");
                    }
                }
            }
            (u, t)
        }
        ResolveProfile::Loaded(u, t) => (u, t),
        ResolveProfile::PromptSelect(mut names) => {
            // Always add demo option to list
            if !names.iter().any(|n| n == "demo") {
                names.push("demo".into());
            }
            eprintln!("Select profile:");
            for (i, n) in names.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, n);
            }
            let line = prompt_string("Enter number (or blank to abort): ")?;
            let Some(name) = line
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|idx| idx.checked_sub(1))
                .and_then(|idx| names.get(idx))
            else {
                return Ok(());
            };
            if name == "demo" {
                return run_demo_mode(parsed.seed).await;
            }
            match profiles_mut.profiles.get(name) {
                Some(entry) => (entry.url.clone(), entry.tls_ca.clone()),
                None => return Ok(()),
            }
        }
        ResolveProfile::PromptCreate(name) => {
            eprintln!("Profile '{name}' does not exist yet.");
            let url = prompt_string("Enter URL (http://HOST:PORT or ws://...): ")?;
            if url.trim().is_empty() {
                return Ok(());
            }
            let ca = prompt_string("Enter TLS CA path (or leave blank): ")?;
            let ca_opt = if ca.trim().is_empty() {
                None
            } else {
                Some(ca.trim().to_string())
            };
            profiles_mut.profiles.insert(
                name.clone(),
                ProfileEntry {
                    url: url.trim().to_string(),
                    tls_ca: ca_opt.clone(),
                },
            );
            if let Err(e) = save_profiles(&profiles_mut) {
                eprintln!("could not save profile '{name}': {e}");
            }
            (url.trim().to_string(), ca_opt)
        }
        ResolveProfile::None => {
            eprintln!("No URL provided and no profiles to select.");
            eprintln!("{}", usage("flockwatch"));
            return Ok(());
        }
    };

    if parsed.dry_run {
        println!("{url}");
        return Ok(());
    }

    // Connect before touching the terminal so failures print normally
    let socket = ws::connect(&url, tls_ca.as_deref()).await?;
    let (tx, rx) = mpsc::channel(CHANNEL_DEPTH);
    let reader = ws::spawn_pump(socket, tx);

    let mut app = App::new();
    let res = app.run(rx).await;
    reader.abort();
    res
}

fn prompt_yes_no(prompt: &str) -> bool {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_ok() {
        matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

fn prompt_string(prompt: &str) -> io::Result<String> {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line)
}

// --- Demo Mode ---

async fn run_demo_mode(seed: Option<u64>) -> anyhow::Result<()> {
    let seed = seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
    });
    info!(seed, "demo mode");
    let (tx, rx) = mpsc::channel(CHANNEL_DEPTH);
    let feed = spawn_demo_feed(
        DemoConfig {
            seed,
            ..DemoConfig::default()
        },
        tx,
    );
    // Same seed, same blip bearings
    let mut app = App::with_rng(StdRng::seed_from_u64(seed));
    let res = app.run(rx).await;
    feed.abort();
    res
}
