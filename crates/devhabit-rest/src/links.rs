//! Link assembly from named routes.
//!
//! Handlers never format URLs themselves. They name the action a link points
//! at and pass the route values, the [`LinkService`] resolves the path
//! template, appends the leftover values as a query string and prefixes the
//! per-request base URL.

use devhabit_core::{DevHabitError, DevHabitResult, LinkDto};
use std::collections::HashMap;
use url::form_urlencoded;

/// Action names of the route table.
pub mod actions {
    pub const GET_HABITS: &str = "GetHabits";
    pub const GET_HABIT: &str = "GetHabit";
    pub const CREATE_HABIT: &str = "CreateHabit";
    pub const UPDATE_HABIT: &str = "UpdateHabit";
    pub const PATCH_HABIT: &str = "PatchHabit";
    pub const DELETE_HABIT: &str = "DeleteHabit";
    pub const UPSERT_HABIT_TAGS: &str = "UpsertHabitTags";
    pub const DELETE_HABIT_TAG: &str = "DeleteHabitTag";
    pub const GET_TAGS: &str = "GetTags";
    pub const GET_TAG: &str = "GetTag";
    pub const CREATE_TAG: &str = "CreateTag";
    pub const UPDATE_TAG: &str = "UpdateTag";
    pub const DELETE_TAG: &str = "DeleteTag";
    pub const GET_USER_BY_ID: &str = "GetUserById";
    pub const GET_CURRENT_USER: &str = "GetCurrentUser";
    pub const GET_USER_PROFILE: &str = "GetUserProfile";
    pub const GET_USER_EVENTS: &str = "GetUserEvents";
    pub const STORE_ACCESS_TOKEN: &str = "StoreAccessToken";
    pub const REVOKE_ACCESS_TOKEN: &str = "RevokeAccessToken";
}

/// HTTP method names used in links.
pub mod methods {
    pub const GET: &str = "GET";
    pub const POST: &str = "POST";
    pub const PUT: &str = "PUT";
    pub const PATCH: &str = "PATCH";
    pub const DELETE: &str = "DELETE";
}

/// A named route, `{placeholder}` segments are filled from route values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub controller: &'static str,
    pub action: &'static str,
    pub template: &'static str,
}

const fn route(controller: &'static str, action: &'static str, template: &'static str) -> Route {
    Route {
        controller,
        action,
        template,
    }
}

/// Every route links can point at.
pub const ROUTES: &[Route] = &[
    route("Habits", actions::GET_HABITS, "/habits"),
    route("Habits", actions::GET_HABIT, "/habits/{id}"),
    route("Habits", actions::CREATE_HABIT, "/habits"),
    route("Habits", actions::UPDATE_HABIT, "/habits/{id}"),
    route("Habits", actions::PATCH_HABIT, "/habits/{id}"),
    route("Habits", actions::DELETE_HABIT, "/habits/{id}"),
    route("HabitTags", actions::UPSERT_HABIT_TAGS, "/habits/{habitId}/tags"),
    route("HabitTags", actions::DELETE_HABIT_TAG, "/habits/{habitId}/tags/{tagId}"),
    route("Tags", actions::GET_TAGS, "/tags"),
    route("Tags", actions::GET_TAG, "/tags/{id}"),
    route("Tags", actions::CREATE_TAG, "/tags"),
    route("Tags", actions::UPDATE_TAG, "/tags/{id}"),
    route("Tags", actions::DELETE_TAG, "/tags/{id}"),
    route("Users", actions::GET_USER_BY_ID, "/users/{id}"),
    route("Users", actions::GET_CURRENT_USER, "/users/me"),
    route("GitHub", actions::GET_USER_PROFILE, "/github/profile"),
    route("GitHub", actions::GET_USER_EVENTS, "/github/events"),
    route("GitHub", actions::STORE_ACCESS_TOKEN, "/github/personal-access-token"),
    route("GitHub", actions::REVOKE_ACCESS_TOKEN, "/github/personal-access-token"),
];

/// Route values in insertion order. `None` values are skipped.
pub type RouteValues<'a> = [(&'a str, Option<String>)];

/// Resolves action names to absolute URLs.
#[derive(Debug, Clone)]
pub struct LinkService {
    routes: HashMap<&'static str, Vec<Route>>,
    public_base_url: Option<String>,
}

impl LinkService {
    /// Builds the service over [`ROUTES`].
    ///
    /// `public_base_url` overrides the base URL derived from request headers.
    #[must_use]
    pub fn new(public_base_url: Option<String>) -> Self {
        Self::with_routes(ROUTES, public_base_url)
    }

    #[must_use]
    pub fn with_routes(routes: &[Route], public_base_url: Option<String>) -> Self {
        let mut table: HashMap<&'static str, Vec<Route>> = HashMap::new();
        for route in routes {
            table.entry(route.action).or_default().push(*route);
        }
        Self {
            routes: table,
            public_base_url: public_base_url.map(|url| url.trim_end_matches('/').to_string()),
        }
    }

    /// Configured public base URL, if any.
    #[must_use]
    pub fn public_base_url(&self) -> Option<&str> {
        self.public_base_url.as_deref()
    }

    /// Creates a link to `action`.
    ///
    /// `controller` disambiguates actions registered by several controllers.
    /// An unknown action is a programming error and surfaces as an internal
    /// error.
    pub fn create(
        &self,
        base_url: &str,
        action: &str,
        rel: &str,
        method: &str,
        values: &RouteValues<'_>,
        controller: Option<&str>,
    ) -> DevHabitResult<LinkDto> {
        let route = self
            .routes
            .get(action)
            .and_then(|candidates| {
                candidates
                    .iter()
                    .find(|route| controller.map_or(true, |c| route.controller.eq_ignore_ascii_case(c)))
            })
            .ok_or_else(|| DevHabitError::internal(format!("Invalid endpoint name provided: {action}")))?;

        let href = format!("{}{}", base_url.trim_end_matches('/'), expand(route.template, values)?);
        Ok(LinkDto::new(href, rel, method))
    }
}

/// Fills the template and appends unused values as query parameters.
fn expand(template: &str, values: &RouteValues<'_>) -> DevHabitResult<String> {
    let mut path = String::with_capacity(template.len());
    let mut used = Vec::new();

    for (index, segment) in template.split('/').enumerate() {
        if index > 0 {
            path.push('/');
        }
        match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) => {
                let value = values
                    .iter()
                    .find(|(key, value)| *key == name && value.is_some())
                    .and_then(|(_, value)| value.as_deref())
                    .ok_or_else(|| DevHabitError::internal(format!("Missing route value '{name}' for {template}")))?;
                path.extend(form_urlencoded::byte_serialize(value.as_bytes()));
                used.push(name);
            }
            None => path.push_str(segment),
        }
    }

    let mut query = form_urlencoded::Serializer::new(String::new());
    let mut has_query = false;
    for (key, value) in values {
        if let Some(value) = value {
            if !used.contains(key) {
                query.append_pair(key, value);
                has_query = true;
            }
        }
    }

    if has_query {
        path.push('?');
        path.push_str(&query.finish());
    }
    Ok(path)
}
