//! Shell commands
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use realm_core::{
    ActivityKind, BrowserStorage, Collaborators, Config, Dashboard, LoginForm, Notice,
    NoticeBoard, Tab,
};

const USAGE: &str = "commands: login <user> <pass> [--remember] | logout | status | \
                     open <page> [title] | activate <tab> | close <tab> | tabs | \
                     activity <event> | dismiss | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login {
        username: String,
        password: String,
        remember: bool,
    },
    Logout,
    Status,
    Open {
        page_id: String,
        title: String,
    },
    Activate(String),
    Close(String),
    Tabs,
    Activity(ActivityKind),
    Dismiss,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let rest: Vec<&str> = words.collect();

        let command = match (verb, rest.as_slice()) {
            ("login", [username, password, flags @ ..]) => Command::Login {
                username: username.to_string(),
                password: password.to_string(),
                remember: flags.contains(&"--remember"),
            },
            ("logout", []) => Command::Logout,
            ("status", []) => Command::Status,
            ("open", [page_id, title @ ..]) => Command::Open {
                page_id: page_id.to_string(),
                title: if title.is_empty() {
                    page_id.to_string()
                } else {
                    title.join(" ")
                },
            },
            ("activate", [tab_id]) => Command::Activate(tab_id.to_string()),
            ("close", [tab_id]) => Command::Close(tab_id.to_string()),
            ("tabs", []) => Command::Tabs,
            ("activity", [event]) => Command::Activity(
                ActivityKind::from_event(event)
                    .ok_or_else(|| format!("Unknown activity event: {}", event))?,
            ),
            ("dismiss", []) => Command::Dismiss,
            ("help", _) => Command::Help,
            ("quit" | "exit", _) => Command::Quit,
            _ => return Err(format!("Invalid command: {}", line.trim())),
        };

        Ok(Some(command))
    }
}

#[derive(Debug, Serialize)]
pub struct TabInfo {
    pub id: String,
    pub title: String,
    pub display_title: String,
    pub state: String,
    pub is_error: bool,
}

impl From<Tab> for TabInfo {
    fn from(tab: Tab) -> Self {
        Self {
            display_title: tab.display_title(),
            is_error: tab.is_error(),
            state: tab.state.as_str().to_string(),
            id: tab.id,
            title: tab.title,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub logged_in: bool,
    pub has_session_info: bool,
    pub username: Option<String>,
    pub state: String,
    pub remaining_minutes: i64,
    pub notice: Option<Notice>,
}

/// A dashboard plus the notice board its session reports to.
pub struct Shell {
    pub dashboard: Dashboard,
    pub notices: NoticeBoard,
}

impl Shell {
    pub fn new(config: Config, storage: BrowserStorage, collaborators: Collaborators) -> Self {
        let notices = NoticeBoard::new();
        let collaborators = Collaborators {
            notifier: Arc::new(notices.clone()),
            ..collaborators
        };

        Self {
            dashboard: Dashboard::new(config, storage, collaborators),
            notices,
        }
    }

    /// Headless shell with storage and pages taken from `config`
    pub fn open(config: Config) -> realm_core::Result<Self> {
        let storage = config.open_storage()?;
        let collaborators = Collaborators::headless(&config);
        Ok(Self::new(config, storage, collaborators))
    }

    pub fn session_info(&self) -> SessionInfo {
        let guard = self.dashboard.auth_guard();
        let session = self.dashboard.session();

        SessionInfo {
            logged_in: guard.is_authenticated(),
            has_session_info: guard.has_session_info(),
            username: session.username(),
            state: session.state().as_str().to_string(),
            remaining_minutes: session.remaining_minutes(),
            notice: self.notices.current(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommandResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

fn reply<T: Serialize>(data: T) -> CommandResult<Value> {
    match serde_json::to_value(data) {
        Ok(value) => CommandResult::ok(value),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

fn answer<T: Serialize>(result: realm_core::Result<T>) -> CommandResult<Value> {
    match result {
        Ok(data) => reply(data),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

pub async fn dispatch(shell: &Shell, command: Command) -> CommandResult<Value> {
    tracing::debug!(?command, "Dispatching command");
    let dashboard = &shell.dashboard;

    match command {
        Command::Login {
            username,
            password,
            remember,
        } => {
            let mut form = LoginForm::new(username, password);
            if remember {
                form = form.remember();
            }
            if let Err(e) = dashboard.login_handler().submit(&form) {
                return CommandResult::err(e.to_string());
            }
            dashboard.start();
            reply(shell.session_info())
        }
        Command::Logout => {
            dashboard.logout();
            reply(shell.session_info())
        }
        Command::Status => reply(shell.session_info()),
        Command::Open { page_id, title } => match dashboard.navigate(&page_id, &title).await {
            Ok(tab_id) => match dashboard.tabs().get_tab(&tab_id) {
                Ok(tab) => reply(TabInfo::from(tab)),
                Err(e) => CommandResult::err(e.to_string()),
            },
            Err(e) => CommandResult::err(e.to_string()),
        },
        Command::Activate(tab_id) => answer(dashboard.activate_tab(&tab_id)),
        Command::Close(tab_id) => answer(dashboard.close_tab(&tab_id)),
        Command::Tabs => answer(
            dashboard
                .open_tabs()
                .map(|tabs| tabs.into_iter().map(TabInfo::from).collect::<Vec<_>>()),
        ),
        Command::Activity(kind) => {
            dashboard.record_activity(kind);
            reply(true)
        }
        Command::Dismiss => {
            shell.notices.dismiss();
            reply(true)
        }
        Command::Help => reply(USAGE),
        Command::Quit => reply(true),
    }
}
