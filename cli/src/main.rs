mod render;


use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use portal::config::{ConfigError, PortalConfig};
use portal::net::api::ApiClient;
use portal::net::error::ApiError;
use portal::net::transport::ReqwestTransport;
use portal::net::types::{BlogPostUpdate, ExperienceUpdate, NewExperience, NewProject, ProjectUpdate};
use portal::pages::blog::{BlogDetailPage, BlogDraft, BlogListPage, update_post};
use portal::pages::login::LoginForm;
use portal::pages::{PageError, content};
use portal::routes::{Navigator, Route};
use portal::state::session::{SessionCell, SessionEvent};
use portal::state::store::SessionStore;
use portal::util::auth::{GuardDecision, guard_route};
use portal::util::shadow::FileShadow;
use tokio::sync::broadcast;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("{0}")]
    Page(String),
    #[error("sign in first: run `portal login`")]
    SignInRequired,
    #[error("session is still being restored")]
    SessionPending,
    #[error("already signed in; run `portal logout` to switch accounts")]
    AlreadySignedIn,
    #[error("no page at {0}")]
    NotFound(String),
    #[error("failed to read password: {0}")]
    Prompt(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<PageError> for CliError {
    fn from(error: PageError) -> Self {
        match error {
            PageError::Redirect(Route::Login) => Self::SignInRequired,
            PageError::Redirect(route) => Self::Page(format!("continue at {route}")),
            PageError::Message(message) => Self::Page(message),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "portal", about = "Terminal front end for the portfolio site")]
struct Cli {
    #[arg(long, env = "PORTAL_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "PORTAL_STATE_DIR")]
    state_dir: Option<String>,

    /// Print raw JSON instead of formatted text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the backend is reachable.
    Health,
    Login(LoginArgs),
    Register(RegisterArgs),
    Logout,
    /// Show the signed-in account.
    Whoami,
    Home,
    /// Render the page at a site path, e.g. `/blog/abc`.
    Open {
        path: String,
    },
    Experience(ExperienceCommand),
    Projects(ProjectCommand),
    Blog(BlogCommand),
    Comment(CommentCommand),
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[arg(long)]
    email: String,
    /// Prompted for when omitted.
    #[arg(long, env = "PORTAL_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    display_name: String,
    #[arg(long, env = "PORTAL_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Args, Debug)]
struct ExperienceCommand {
    #[command(subcommand)]
    command: Option<AdminSubcommand>,
}

#[derive(Args, Debug)]
struct ProjectCommand {
    #[command(subcommand)]
    command: Option<AdminSubcommand>,
}

/// Admin edits shared by experiences and projects. Payloads are JSON.
#[derive(Subcommand, Debug)]
enum AdminSubcommand {
    List,
    Add {
        #[arg(long)]
        data: String,
    },
    Edit {
        id: String,
        #[arg(long)]
        data: String,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Debug)]
struct BlogCommand {
    #[command(subcommand)]
    command: Option<BlogSubcommand>,
}

#[derive(Subcommand, Debug)]
enum BlogSubcommand {
    List,
    Show {
        post_id: String,
    },
    New {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        summary: String,
        #[arg(long)]
        content: String,
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        cover_image_url: Option<String>,
    },
    Edit {
        post_id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        summary: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long = "tag")]
        tags: Option<Vec<String>>,
        #[arg(long)]
        published: Option<bool>,
    },
    Delete {
        post_id: String,
    },
}

#[derive(Args, Debug)]
struct CommentCommand {
    #[command(subcommand)]
    command: CommentSubcommand,
}

#[derive(Subcommand, Debug)]
enum CommentSubcommand {
    Add { post_id: String, text: String },
    Delete { post_id: String, comment_id: String },
}

// =============================================================================
// APP
// =============================================================================

struct App {
    store: Arc<SessionStore>,
    navigator: Navigator,
    events: broadcast::Receiver<SessionEvent>,
    json: bool,
}

impl App {
    fn new(config: &PortalConfig, json: bool) -> Result<Self, CliError> {
        let transport = Arc::new(ReqwestTransport::new(config)?);
        let shadow = Arc::new(FileShadow::new(config.shadow_path()));
        let session = Arc::new(SessionCell::new(shadow));
        let api = Arc::new(ApiClient::new(transport, session));
        let events = api.subscribe();
        let store = Arc::new(SessionStore::new(api));
        Ok(Self { store, navigator: Navigator::new(Route::Home), events, json })
    }

    fn api(&self) -> &ApiClient {
        self.store.api()
    }

    /// Restore the saved session and wait for it to resolve before anything
    /// auth-dependent is printed.
    async fn resolve_session(&mut self) {
        if let Err(error) = self.store.spawn_restore().await {
            tracing::warn!(%error, "session restore task failed");
        }
        if self.drain_session_events() {
            eprintln!("Your saved session has expired.");
        }
    }

    /// Apply pending session events to navigation. Returns whether a
    /// redirect to login happened.
    fn drain_session_events(&mut self) -> bool {
        let mut redirected = false;
        loop {
            match self.events.try_recv() {
                Ok(event) => redirected |= self.navigator.handle_session_event(event),
                Err(broadcast::error::TryRecvError::Lagged(_)) => {
                    redirected |= self.navigator.handle_session_event(SessionEvent::Invalidated);
                }
                Err(_) => return redirected,
            }
        }
    }

    /// Navigate to `route` and apply the guard before rendering.
    fn enter(&self, route: Route) -> Result<(), CliError> {
        self.navigator.navigate(route.clone());
        let decision = guard_route(&route, &self.store.state());
        if let GuardDecision::Redirect(target) = &decision {
            self.navigator.navigate(target.clone());
        }
        admit(decision)
    }
}

/// Map a guard decision to "render" or the error shown instead.
fn admit(decision: GuardDecision) -> Result<(), CliError> {
    match decision {
        GuardDecision::Render => Ok(()),
        GuardDecision::Pending => Err(CliError::SessionPending),
        GuardDecision::Redirect(Route::Login) => Err(CliError::SignInRequired),
        GuardDecision::Redirect(_) => Err(CliError::AlreadySignedIn),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let api_url = cli.api_url.clone();
    let state_dir = cli.state_dir.clone();
    let config = PortalConfig::from_lookup(|key| match key {
        "PORTAL_API_URL" => api_url.clone(),
        "PORTAL_STATE_DIR" => state_dir.clone(),
        _ => std::env::var(key).ok(),
    })?;
    tracing::debug!(api_url = %config.api_url, state_dir = %config.state_dir.display(), "config loaded");

    let mut app = App::new(&config, cli.json)?;
    if let Command::Health = cli.command {
        return run_health(&app).await;
    }

    app.resolve_session().await;
    let result = dispatch(&app, cli.command).await;
    if app.drain_session_events() {
        eprintln!("Your session has expired. Run `portal login` to sign in again.");
    }
    result
}

async fn dispatch(app: &App, command: Command) -> Result<(), CliError> {
    match command {
        Command::Health => run_health(app).await,
        Command::Login(args) => run_login(app, args).await,
        Command::Register(args) => run_register(app, args).await,
        Command::Logout => run_logout(app).await,
        Command::Whoami => run_whoami(app),
        Command::Home => run_home(app),
        Command::Open { path } => run_open(app, &path).await,
        Command::Experience(cmd) => run_experience(app, cmd.command.unwrap_or(AdminSubcommand::List)).await,
        Command::Projects(cmd) => run_projects(app, cmd.command.unwrap_or(AdminSubcommand::List)).await,
        Command::Blog(cmd) => run_blog(app, cmd.command.unwrap_or(BlogSubcommand::List)).await,
        Command::Comment(cmd) => run_comment(app, cmd.command).await,
    }
}

// =============================================================================
// AUTH
// =============================================================================

async fn run_health(app: &App) -> Result<(), CliError> {
    let health = app.api().health().await?;
    render::health(&health, app.json)
}

fn read_password(password: Option<String>) -> Result<String, CliError> {
    match password {
        Some(password) => Ok(password),
        None => Ok(rpassword::prompt_password("Password: ")?),
    }
}

async fn run_login(app: &App, args: LoginArgs) -> Result<(), CliError> {
    app.enter(Route::Login)?;
    let password = read_password(args.password)?;
    let next = LoginForm::login(&args.email, &password).submit(&app.store).await?;
    app.navigator.navigate(next);
    if let Some(user) = app.store.current_user() {
        render::signed_in(&user, app.json)?;
    }
    Ok(())
}

async fn run_register(app: &App, args: RegisterArgs) -> Result<(), CliError> {
    app.enter(Route::Login)?;
    let password = read_password(args.password)?;
    let next = LoginForm::register(&args.email, &password, &args.display_name).submit(&app.store).await?;
    app.navigator.navigate(next);
    if let Some(user) = app.store.current_user() {
        render::signed_in(&user, app.json)?;
    }
    Ok(())
}

async fn run_logout(app: &App) -> Result<(), CliError> {
    app.store.logout().await;
    app.navigator.navigate(Route::Home);
    println!("Signed out.");
    Ok(())
}

fn run_whoami(app: &App) -> Result<(), CliError> {
    match app.store.current_user() {
        Some(user) => render::user(&user, app.json),
        None => Err(CliError::SignInRequired),
    }
}

fn run_home(app: &App) -> Result<(), CliError> {
    app.enter(Route::Home)?;
    render::home(app.store.current_user().as_ref());
    Ok(())
}

async fn run_open(app: &App, path: &str) -> Result<(), CliError> {
    match Route::parse(path) {
        Route::Home => run_home(app),
        Route::Experience => run_experience(app, AdminSubcommand::List).await,
        Route::Projects => run_projects(app, AdminSubcommand::List).await,
        Route::Blog => run_blog(app, BlogSubcommand::List).await,
        Route::BlogPost(post_id) => run_blog(app, BlogSubcommand::Show { post_id }).await,
        Route::BlogNew => {
            app.enter(Route::BlogNew)?;
            println!("Create a post with `portal blog new --title ... --content ...`.");
            Ok(())
        }
        Route::Login => {
            app.enter(Route::Login)?;
            println!("Sign in with `portal login --email ...`.");
            Ok(())
        }
        Route::NotFound(path) => Err(CliError::NotFound(path)),
    }
}

// =============================================================================
// CONTENT
// =============================================================================

async fn run_experience(app: &App, command: AdminSubcommand) -> Result<(), CliError> {
    app.enter(Route::Experience)?;
    match command {
        AdminSubcommand::List => {
            let items = content::load_experiences(app.api()).await?;
            render::experiences(&items, app.json)
        }
        AdminSubcommand::Add { data } => {
            let data: NewExperience = serde_json::from_str(&data)?;
            let created = content::create_experience(&app.store, &data).await?;
            render::experiences(std::slice::from_ref(&created), app.json)
        }
        AdminSubcommand::Edit { id, data } => {
            let data: ExperienceUpdate = serde_json::from_str(&data)?;
            let updated = content::update_experience(&app.store, &id, &data).await?;
            render::experiences(std::slice::from_ref(&updated), app.json)
        }
        AdminSubcommand::Delete { id } => {
            content::delete_experience(&app.store, &id).await?;
            println!("Deleted experience {id}.");
            Ok(())
        }
    }
}

async fn run_projects(app: &App, command: AdminSubcommand) -> Result<(), CliError> {
    app.enter(Route::Projects)?;
    match command {
        AdminSubcommand::List => {
            let items = content::load_projects(app.api()).await?;
            render::projects(&items, app.json)
        }
        AdminSubcommand::Add { data } => {
            let data: NewProject = serde_json::from_str(&data)?;
            let created = content::create_project(&app.store, &data).await?;
            render::projects(std::slice::from_ref(&created), app.json)
        }
        AdminSubcommand::Edit { id, data } => {
            let data: ProjectUpdate = serde_json::from_str(&data)?;
            let updated = content::update_project(&app.store, &id, &data).await?;
            render::projects(std::slice::from_ref(&updated), app.json)
        }
        AdminSubcommand::Delete { id } => {
            content::delete_project(&app.store, &id).await?;
            println!("Deleted project {id}.");
            Ok(())
        }
    }
}

// =============================================================================
// BLOG
// =============================================================================

async fn run_blog(app: &App, command: BlogSubcommand) -> Result<(), CliError> {
    match command {
        BlogSubcommand::List => {
            app.enter(Route::Blog)?;
            let page = BlogListPage::load(&app.store).await?;
            render::blog_list(&page, app.json)
        }
        BlogSubcommand::Show { post_id } => {
            app.enter(Route::BlogPost(post_id.clone()))?;
            let page = BlogDetailPage::load(app.api(), &post_id).await?;
            render::blog_detail(&page, &app.store, app.json)
        }
        BlogSubcommand::New { title, summary, content, tags, cover_image_url } => {
            app.enter(Route::BlogNew)?;
            let mut draft = BlogDraft { title, summary, content, cover_image_url, ..BlogDraft::default() };
            for tag in &tags {
                draft.add_tag(tag);
            }
            let next = draft.submit(&app.store).await?;
            app.navigator.navigate(next);
            println!("Post published.");
            Ok(())
        }
        BlogSubcommand::Edit { post_id, title, summary, content, tags, published } => {
            app.enter(Route::BlogPost(post_id.clone()))?;
            let update = BlogPostUpdate {
                title,
                summary,
                content,
                tags,
                cover_image_url: None,
                is_published: published,
            };
            let post = update_post(&app.store, &post_id, &update).await?;
            render::post_header(&post, app.json)
        }
        BlogSubcommand::Delete { post_id } => {
            app.enter(Route::BlogPost(post_id.clone()))?;
            let page = BlogDetailPage::load(app.api(), &post_id).await?;
            let next = page.delete_post(&app.store).await?;
            app.navigator.navigate(next);
            println!("Deleted post {post_id}.");
            Ok(())
        }
    }
}

async fn run_comment(app: &App, command: CommentSubcommand) -> Result<(), CliError> {
    match command {
        CommentSubcommand::Add { post_id, text } => {
            app.enter(Route::BlogPost(post_id.clone()))?;
            let mut page = BlogDetailPage::load(app.api(), &post_id).await?;
            let comment = page.submit_comment(&app.store, &text).await?;
            render::comment(comment, true, app.json)
        }
        CommentSubcommand::Delete { post_id, comment_id } => {
            app.enter(Route::BlogPost(post_id.clone()))?;
            let mut page = BlogDetailPage::load(app.api(), &post_id).await?;
            page.delete_comment(&app.store, &comment_id).await?;
            println!("Deleted comment {comment_id}.");
            Ok(())
        }
    }
}
