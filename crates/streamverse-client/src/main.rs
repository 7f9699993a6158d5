//! # streamverse
//!
//! Command-line driver for the StreamVerse shell.  Each invocation mounts the
//! shell over the local store, runs one page command, prints the resulting
//! page model and tears the shell down.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use streamverse_catalog::MovieSummary;
use streamverse_client::commands::{auth, billing, catalog, favorites, subscription};
use streamverse_client::{App, ClientConfig, Navigation, Notice, Screen};
use streamverse_shared::{FavoriteId, Plan, TitleId};
use tracing::info;

/// Browse the catalog, manage favorites and subscribe from the terminal.
#[derive(Parser)]
#[command(name = "streamverse", version)]
#[command(about = "StreamVerse streaming catalog client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account.
    Register {
        /// Display name stored in the profile
        #[arg(long)]
        name: String,
        email: String,
        #[arg(long, env = "STREAMVERSE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign in; the session is kept until `logout`.
    Login {
        email: String,
        #[arg(long, env = "STREAMVERSE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    Logout,

    /// Queue a password reset link.
    #[command(name = "reset-password")]
    ResetPassword { email: String },

    /// Show the signed-in user and their plan.
    Whoami,

    /// Landing listings.
    Home,

    Search { query: String },

    /// Title detail page.
    Movie { id: TitleId },

    #[command(subcommand)]
    Favorites(FavoriteCommands),

    /// Buy a plan (basic or premium).
    Subscribe {
        plan: Plan,
        /// Skip the payment confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Payment history.
    Billing,

    /// Open any route, e.g. `/billing` or `/movie/550`.
    Open { path: String },
}

#[derive(Subcommand)]
enum FavoriteCommands {
    List,
    /// Save a title.
    Add { id: TitleId },
    /// Remove a saved entry by its key.
    Remove { key: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    streamverse_client::init_tracing();
    let cli = Cli::parse();

    let config = ClientConfig::from_env();
    let app = App::open(config)?;
    info!(version = env!("CARGO_PKG_VERSION"), "streamverse started");

    let session = app.session();
    app.sync().synced_with(session.as_ref().map(|s| &s.uid)).await;

    let result = run(&app, cli.command).await;
    app.shutdown().await;
    result
}

async fn run(app: &App, command: Commands) -> Result<()> {
    match command {
        Commands::Register {
            name,
            email,
            password,
        } => print_outcome(auth::register(app, &name, &email, &password).await),
        Commands::Login { email, password } => {
            print_outcome(auth::login(app, &email, &password).await)
        }
        Commands::Logout => {
            let route = auth::logout(app).await?;
            println!("Signed out. Next: {route}");
            Ok(())
        }
        Commands::ResetPassword { email } => {
            print_outcome(auth::reset_password(app, &email).await)
        }
        Commands::Whoami => {
            let view = app.view();
            match (view.session(), view.profile()) {
                (Some(session), Some(profile)) => {
                    println!("{} <{}>", profile.name, profile.email);
                    println!("uid:  {}", session.uid);
                    println!("plan: {}", view.plan_label().unwrap_or("none"));
                }
                _ => println!("Not signed in."),
            }
            if let Some(guest) = app.guest_id() {
                println!("guest id: {guest}");
            }
            Ok(())
        }
        Commands::Home => print_navigation(app, &app.navigate("/home").await?),
        Commands::Search { query } => {
            if app.session().is_none() {
                return print_navigation(app, &app.navigate("/search").await?);
            }
            let found = catalog::search(app, &query).await;
            println!("Results for \"{}\":", found.query);
            print_listing(app, &found.results);
            Ok(())
        }
        Commands::Movie { id } => {
            print_navigation(app, &app.navigate(&format!("/movie/{id}")).await?)
        }
        Commands::Favorites(FavoriteCommands::List) => {
            print_navigation(app, &app.navigate("/favorites").await?)
        }
        Commands::Favorites(FavoriteCommands::Add { id }) => {
            let details = app.catalog().details(id).await?;
            let saved =
                favorites::add(app, id, &details.title, details.poster_path.as_deref()).await?;
            println!("Saved \"{}\" as {}", details.title, saved.id);
            Ok(())
        }
        Commands::Favorites(FavoriteCommands::Remove { key }) => {
            favorites::remove(app, &FavoriteId(key)).await?;
            println!("Removed.");
            Ok(())
        }
        Commands::Subscribe { plan, yes } => {
            let outcome = subscription::subscribe(app, plan, |prompt| yes || confirm(prompt)).await;
            match outcome {
                Some(outcome) => {
                    print_notice(&outcome.notice);
                    if let Some(route) = outcome.route {
                        println!("Next: {route}");
                    }
                    Ok(())
                }
                None => {
                    println!("Cancelled.");
                    Ok(())
                }
            }
        }
        Commands::Billing => print_navigation(app, &app.navigate("/billing").await?),
        Commands::Open { path } => print_navigation(app, &app.navigate(&path).await?),
    }
}

fn confirm(prompt: &Notice) -> bool {
    print!("{}\n{} [y/N] ", prompt.title, prompt.text);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(_) => matches!(line.trim(), "y" | "Y" | "yes"),
        Err(_) => false,
    }
}

fn print_notice(notice: &Notice) {
    println!("[{:?}] {}", notice.level, notice);
}

fn print_outcome(outcome: auth::AuthOutcome) -> Result<()> {
    print_notice(&outcome.notice);
    match outcome.route {
        Some(route) => {
            println!("Next: {route}");
            Ok(())
        }
        None => bail!("{}", outcome.notice.text),
    }
}

fn print_navigation(app: &App, nav: &Navigation) -> Result<()> {
    if nav.redirected() {
        println!("{} -> {}", nav.requested, nav.route);
    }
    if let Some(notice) = &nav.notice {
        print_notice(notice);
    }

    match &nav.screen {
        Screen::Landing => println!("Welcome to StreamVerse. Sign in or register to start watching."),
        Screen::Login => println!("Sign in with `streamverse login <email>`."),
        Screen::Register => println!("Create an account with `streamverse register --name <name> <email>`."),
        Screen::ForgotPassword => println!("Reset with `streamverse reset-password <email>`."),
        Screen::Home(feed) => {
            if let Some(trailer) = app.hero_trailer() {
                println!("Now playing: {trailer}");
            }
            if let Some(featured) = &feed.featured {
                println!("Featured: {} ({})", featured.title, featured.id);
            }
            for (heading, listing) in [
                ("Popular", &feed.popular),
                ("Trending This Week", &feed.trending),
                ("Top Rated", &feed.top_rated),
                ("Action", &feed.action),
            ] {
                println!("\n{heading}");
                print_listing(app, listing);
            }
        }
        Screen::Search(results) => print_listing(app, &results.results),
        Screen::Favorites(saved) => {
            if saved.is_empty() {
                println!("No favorites yet.");
            }
            for favorite in saved {
                println!("{}  {}  ({})", favorite.id, favorite.favorite.title, favorite.title_id());
            }
        }
        Screen::Subscribe(screen) => {
            if let Some(plan) = &screen.current_plan {
                println!("You're subscribed to {plan}.");
            }
            for plan in &screen.plans {
                println!("{:<8} ₦{:<6} {}", plan.name(), plan.price(), plan.description());
            }
        }
        Screen::Billing(payments) => {
            if payments.is_empty() {
                println!("No payments yet.");
            }
            for record in payments {
                println!("{}", billing::row(record).join("  "));
            }
        }
        Screen::Movie(movie) => {
            let Some(page) = &movie.page else {
                println!("Title {} is unavailable right now.", movie.id);
                return Ok(());
            };
            let details = &page.details;
            println!(
                "{} ({})  {:.1}/10",
                details.title,
                details.release_year().unwrap_or("----"),
                details.vote_average
            );
            println!("{}", details.overview);
            if let Some(url) = page.trailer_embed_url() {
                println!("Trailer: {url}");
            }
            let cast: Vec<&str> = page.cast.iter().map(|c| c.name.as_str()).collect();
            println!("Cast: {}", cast.join(", "));
            println!("Favorite: {}", if movie.is_favorite { "yes" } else { "no" });
            println!("\nMore like this");
            print_listing(app, &page.related);
        }
    }
    Ok(())
}

fn print_listing(app: &App, movies: &[MovieSummary]) {
    for movie in movies {
        println!("  {:>8}  {}  -> {}", movie.id, movie.title, app.select_title(movie.id));
    }
}
