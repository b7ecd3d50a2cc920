/// Server-rendered dashboard pages
///
/// Pages are plain HTML strings assembled with `format!`. Every value that
/// came from storage or a request goes through [`escape`] first.

use crate::flash::Flash;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use residence_shared::models::{
    account::AccountView,
    apartment::Apartment,
    resident::ResidentDetails,
};
use serde::Serialize;
use std::fmt::Write as _;

const STYLE: &str = "
body { font-family: system-ui, sans-serif; margin: 0; background: #f5f6f8; color: #222; }
nav { background: #2c3e50; color: #fff; padding: 0.75rem 1.5rem; display: flex; justify-content: space-between; }
nav a { color: #fff; text-decoration: none; margin-left: 1rem; }
main { max-width: 960px; margin: 2rem auto; background: #fff; padding: 1.5rem; border-radius: 6px; }
table { width: 100%; border-collapse: collapse; }
th, td { text-align: left; padding: 0.5rem; border-bottom: 1px solid #e1e4e8; }
label { display: block; margin-top: 0.75rem; }
input[type=text], input[type=number], input[type=password], select, textarea { width: 100%; padding: 0.4rem; }
button { margin-top: 1rem; padding: 0.4rem 1rem; }
.alert { padding: 0.75rem; margin-bottom: 1rem; border-radius: 4px; }
.alert.success { background: #e3f6e8; color: #1e6b34; }
.alert.error { background: #fdecea; color: #8a1c13; }
.inline { display: inline; }
";

/// Escapes text for HTML element content and quoted attributes
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, account: Option<&AccountView>, flash: Option<&Flash>, body: &str) -> String {
    let nav = match account {
        Some(account) => format!(
            "<nav><span>Residence Manager</span><span>{} \
             <a href=\"/view/residents\">Residents</a>\
             <a href=\"/residents/add\">Add resident</a>\
             <a href=\"/logout\">Log out</a></span></nav>",
            escape(&account.username)
        ),
        None => "<nav><span>Residence Manager</span></nav>".to_string(),
    };

    let alert = flash
        .map(|f| {
            format!(
                "<div class=\"alert {}\">{}</div>",
                f.kind.as_str(),
                escape(&f.message)
            )
        })
        .unwrap_or_default();

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{nav}\n\
         <main>\n<h1>{title}</h1>\n{alert}\n{body}\n</main>\n</body>\n</html>\n",
        title = escape(title),
    )
}

/// Sign-in form
pub fn signin(flash: Option<&Flash>) -> Html<String> {
    let body = "<form method=\"post\" action=\"/login\">\
        <label>Username <input type=\"text\" name=\"username\" autocomplete=\"username\"></label>\
        <label>Password <input type=\"password\" name=\"password\" autocomplete=\"current-password\"></label>\
        <button type=\"submit\">Sign in</button></form>";
    Html(layout("Sign In", None, flash, body))
}

/// Residents table, newest first
pub fn dashboard(
    account: &AccountView,
    residents: &[ResidentDetails],
    flash: Option<&Flash>,
) -> Html<String> {
    let mut body = String::new();

    if residents.is_empty() {
        body.push_str("<p>No residents yet.</p>");
    } else {
        body.push_str(
            "<table><thead><tr><th>Name</th><th>Description</th><th>Apartment</th>\
             <th>Floor</th><th>Year of Birth</th><th>Owned</th><th></th></tr></thead><tbody>",
        );
        for resident in residents {
            let _ = write!(
                body,
                "<tr><td>{name}</td><td>{description}</td><td>{apartment}</td>\
                 <td>{floor}</td><td>{yob}</td><td>{owned}</td>\
                 <td><a href=\"/residents/{id}\">Edit</a> \
                 <form class=\"inline\" method=\"post\" action=\"/residents/delete/{id}\">\
                 <button type=\"submit\">Delete</button></form></td></tr>",
                name = escape(&resident.resident_name),
                description = escape(&resident.resident_description),
                apartment = escape(&resident.apartment.apartment_name),
                floor = resident.floor,
                yob = resident.year_of_birth,
                owned = if resident.is_owned { "Yes" } else { "No" },
                id = resident.id,
            );
        }
        body.push_str("</tbody></table>");
    }

    Html(layout("Residents list", Some(account), flash, &body))
}

/// Which resident form to render
#[derive(Debug, Clone, Copy)]
pub enum ResidentForm<'a> {
    Add,
    Edit(&'a ResidentDetails),
}

/// Add or edit form for a resident
pub fn resident_form(
    account: &AccountView,
    form: ResidentForm<'_>,
    apartments: &[Apartment],
    flash: Option<&Flash>,
) -> Html<String> {
    let (title, action, current) = match form {
        ResidentForm::Add => ("Add Resident", "/residents/add".to_string(), None),
        ResidentForm::Edit(resident) => (
            "Edit Resident",
            format!("/residents/{}", resident.id),
            Some(resident),
        ),
    };

    let text = |value: Option<String>| value.map(|v| escape(&v)).unwrap_or_default();
    let name = text(current.map(|r| r.resident_name.clone()));
    let description = text(current.map(|r| r.resident_description.clone()));
    let floor = text(current.map(|r| r.floor.to_string()));
    let yob = text(current.map(|r| r.year_of_birth.to_string()));
    let checked = if current.map(|r| r.is_owned).unwrap_or(false) {
        " checked"
    } else {
        ""
    };

    let mut options = String::from("<option value=\"\">Select an apartment</option>");
    for apartment in apartments {
        let selected = if current.map(|r| r.apartment.id) == Some(apartment.id) {
            " selected"
        } else {
            ""
        };
        let _ = write!(
            options,
            "<option value=\"{}\"{}>{}</option>",
            apartment.id,
            selected,
            escape(&apartment.apartment_name)
        );
    }

    let body = format!(
        "<form method=\"post\" action=\"{action}\">\
         <label>Resident name <input type=\"text\" name=\"residentName\" value=\"{name}\"></label>\
         <label>Description <textarea name=\"residentDescription\">{description}</textarea></label>\
         <label>Apartment <select name=\"apartment\">{options}</select></label>\
         <label>Floor <input type=\"number\" name=\"floor\" min=\"1\" max=\"40\" value=\"{floor}\"></label>\
         <label>Year of Birth <input type=\"number\" name=\"yOB\" value=\"{yob}\"></label>\
         <label><input type=\"checkbox\" name=\"isOwned\"{checked}> Owned</label>\
         <button type=\"submit\">Save</button> <a href=\"/view/residents\">Cancel</a></form>"
    );

    Html(layout(title, Some(account), flash, &body))
}

/// Error document rendered for unknown routes and server failures
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPage {
    pub title: String,
    pub message: String,
    pub status: u16,
}

impl ErrorPage {
    pub fn not_found() -> Self {
        Self {
            title: "404 Not Found".to_string(),
            message: "The page you are looking for does not exist".to_string(),
            status: StatusCode::NOT_FOUND.as_u16(),
        }
    }

    pub fn server_error() -> Self {
        Self {
            title: "Server Error".to_string(),
            message: "Something went wrong on the server".to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
        }
    }
}

impl IntoResponse for ErrorPage {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = format!(
            "<p>{}</p><p><a href=\"/view/residents\">Back to residents</a></p>",
            escape(&self.message)
        );
        (status, Html(layout(&self.title, None, None, &body))).into_response()
    }
}
