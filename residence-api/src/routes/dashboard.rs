/// Dashboard pages and form handlers (session required)
///
/// Form posts never return errors to the browser. Every outcome becomes a
/// flash message and a redirect: back to the form on failure, to the
/// residents list on success.

use crate::{
    app::AppState,
    flash::{self, Flash},
    middleware::auth::CurrentAccount,
    views::{self, ErrorPage, ResidentForm},
};
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Extension, Form,
};
use axum_extra::extract::cookie::CookieJar;
use residence_shared::registry::{
    validation::{IntegerInput, ResidentDraft},
    RegistryError,
};
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

const RESIDENTS_PAGE: &str = "/view/residents";

/// Resident form as posted by the browser
///
/// Every value arrives as text; an unchecked `isOwned` box is simply absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentFormData {
    pub resident_name: Option<String>,
    pub resident_description: Option<String>,
    pub floor: Option<String>,
    #[serde(rename = "yOB")]
    pub year_of_birth: Option<String>,
    pub apartment: Option<String>,
    pub is_owned: Option<String>,
}

impl From<ResidentFormData> for ResidentDraft {
    fn from(form: ResidentFormData) -> Self {
        ResidentDraft {
            resident_name: form.resident_name,
            resident_description: form.resident_description,
            floor: form.floor.map(IntegerInput::Text),
            year_of_birth: form.year_of_birth.map(IntegerInput::Text),
            is_owned: Some(form.is_owned.as_deref() == Some("on")),
            apartment: form.apartment,
        }
    }
}

/// Flash text for a failed write; internal details stay in the log
fn failure_message(err: &RegistryError, action: &str) -> String {
    if err.is_internal() {
        error!(error = %err, action, "Dashboard write failed");
        format!("Failed to {} resident", action)
    } else {
        err.to_string()
    }
}

/// `GET /view/residents`
pub async fn residents_page(
    State(state): State<AppState>,
    Extension(CurrentAccount(account)): Extension<CurrentAccount>,
    jar: CookieJar,
) -> Response {
    match state.residents.list().await {
        Ok(residents) => {
            let (jar, flash) = flash::take(jar);
            (jar, views::dashboard(&account, &residents, flash.as_ref())).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to load residents");
            ErrorPage::server_error().into_response()
        }
    }
}

/// `GET /residents/add`
pub async fn add_resident_page(
    State(state): State<AppState>,
    Extension(CurrentAccount(account)): Extension<CurrentAccount>,
    jar: CookieJar,
) -> Response {
    match state.apartments.list().await {
        Ok(apartments) => {
            let (jar, flash) = flash::take(jar);
            let page = views::resident_form(&account, ResidentForm::Add, &apartments, flash.as_ref());
            (jar, page).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to load apartments");
            flash::redirect(jar, Flash::error("Failed to load apartments"), RESIDENTS_PAGE)
        }
    }
}

/// `POST /residents/add`
pub async fn add_resident(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ResidentFormData>,
) -> Response {
    match state.residents.create(&form.into()).await {
        Ok(_) => flash::redirect(jar, Flash::success("Resident added successfully"), RESIDENTS_PAGE),
        Err(e) => flash::redirect(jar, Flash::error(failure_message(&e, "add")), "/residents/add"),
    }
}

/// `GET /residents/:id`
pub async fn edit_resident_page(
    State(state): State<AppState>,
    Extension(CurrentAccount(account)): Extension<CurrentAccount>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Response {
    let Ok(id) = Uuid::parse_str(&id) else {
        return flash::redirect(jar, Flash::error("Resident not found"), RESIDENTS_PAGE);
    };

    let loaded = match state.residents.get(id).await {
        Ok(resident) => state
            .apartments
            .list()
            .await
            .map(|apartments| (resident, apartments)),
        Err(e) => Err(e),
    };

    match loaded {
        Ok((resident, apartments)) => {
            let (jar, flash) = flash::take(jar);
            let page = views::resident_form(
                &account,
                ResidentForm::Edit(&resident),
                &apartments,
                flash.as_ref(),
            );
            (jar, page).into_response()
        }
        Err(RegistryError::NotFound(message)) => {
            flash::redirect(jar, Flash::error(message), RESIDENTS_PAGE)
        }
        Err(e) => {
            error!(error = %e, resident_id = %id, "Failed to load resident");
            flash::redirect(jar, Flash::error("Failed to load resident"), RESIDENTS_PAGE)
        }
    }
}

/// `POST /residents/:id`
pub async fn edit_resident(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(raw_id): Path<String>,
    Form(form): Form<ResidentFormData>,
) -> Response {
    let Ok(id) = Uuid::parse_str(&raw_id) else {
        return flash::redirect(jar, Flash::error("Resident not found"), RESIDENTS_PAGE);
    };

    match state.residents.update(id, &form.into()).await {
        Ok(_) => flash::redirect(
            jar,
            Flash::success("Resident updated successfully"),
            RESIDENTS_PAGE,
        ),
        Err(RegistryError::NotFound(message)) => {
            flash::redirect(jar, Flash::error(message), RESIDENTS_PAGE)
        }
        Err(e) => flash::redirect(
            jar,
            Flash::error(failure_message(&e, "update")),
            &format!("/residents/{}", id),
        ),
    }
}

/// `POST /residents/delete/:id`
pub async fn delete_resident(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Response {
    let outcome = match Uuid::parse_str(&id) {
        Ok(id) => state.residents.delete(id).await,
        Err(_) => Err(RegistryError::NotFound("Resident not found".to_string())),
    };

    let flash = match outcome {
        Ok(_) => Flash::success("resident deleted successfully"),
        Err(RegistryError::NotFound(_)) => Flash::error("resident not found"),
        Err(e) => {
            error!(error = %e, "Failed to delete resident");
            Flash::error("Failed to delete resident")
        }
    };
    flash::redirect(jar, flash, RESIDENTS_PAGE)
}
