//! Menus and callback payloads.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup};

use crate::database::models::{Category, Movie};

/// Admin reply-keyboard labels. Selecting one starts or runs an admin action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminMenu {
    Statistics,
    AddMovie,
    DeleteMovie,
    AddCategory,
    DeleteCategory,
    TopMovies,
    Broadcast,
}

impl AdminMenu {
    pub const ALL: [AdminMenu; 7] = [
        AdminMenu::Statistics,
        AdminMenu::AddMovie,
        AdminMenu::DeleteMovie,
        AdminMenu::AddCategory,
        AdminMenu::DeleteCategory,
        AdminMenu::TopMovies,
        AdminMenu::Broadcast,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AdminMenu::Statistics => "📊 Statistics",
            AdminMenu::AddMovie => "➕ Add movie",
            AdminMenu::DeleteMovie => "❌ Delete movie",
            AdminMenu::AddCategory => "🗂 Add category",
            AdminMenu::DeleteCategory => "🗑 Delete category",
            AdminMenu::TopMovies => "📥 Top movies",
            AdminMenu::Broadcast => "📤 Broadcast",
        }
    }

    pub fn from_label(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|item| item.label() == text)
    }
}

/// Inline-button actions carried in callback data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    Movies,
    Categories,
    Category(String),
    Movie(String),
    Search,
    Info,
}

impl CallbackAction {
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "movies" => return Some(Self::Movies),
            "categories" => return Some(Self::Categories),
            "search" => return Some(Self::Search),
            "info" => return Some(Self::Info),
            _ => {}
        }

        let (kind, arg) = data.split_once(':')?;
        if arg.is_empty() {
            return None;
        }
        match kind {
            "category" => Some(Self::Category(arg.to_string())),
            "movie" => Some(Self::Movie(arg.to_string())),
            _ => None,
        }
    }

    pub fn data(&self) -> String {
        match self {
            Self::Movies => "movies".to_string(),
            Self::Categories => "categories".to_string(),
            Self::Category(name) => format!("category:{name}"),
            Self::Movie(code) => format!("movie:{code}"),
            Self::Search => "search".to_string(),
            Self::Info => "info".to_string(),
        }
    }
}

pub fn main_menu() -> InlineKeyboardMarkup {
    let rows = [
        ("🎬 Movies", CallbackAction::Movies),
        ("🗂 Categories", CallbackAction::Categories),
        ("🔎 Search", CallbackAction::Search),
        ("ℹ️ Info", CallbackAction::Info),
    ]
    .into_iter()
    .map(|(text, action)| vec![InlineKeyboardButton::callback(text, action.data())]);
    InlineKeyboardMarkup::new(rows)
}

pub fn admin_menu() -> KeyboardMarkup {
    let rows: Vec<Vec<KeyboardButton>> = AdminMenu::ALL
        .chunks(2)
        .map(|row| row.iter().map(|item| KeyboardButton::new(item.label())).collect())
        .collect();
    KeyboardMarkup::new(rows)
        .resize_keyboard(true)
        .one_time_keyboard(true)
}

pub fn movie_list(movies: &[Movie]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(movies.iter().map(|movie| {
        vec![InlineKeyboardButton::callback(
            movie.title.clone(),
            CallbackAction::Movie(movie.code.clone()).data(),
        )]
    }))
}

pub fn category_list(categories: &[Category]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(categories.iter().map(|category| {
        vec![InlineKeyboardButton::callback(
            category.name.clone(),
            CallbackAction::Category(category.name.clone()).data(),
        )]
    }))
}
