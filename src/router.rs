//! Routes of the shell

/// A screen reachable by path
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Route {
    /// `/` - registration form
    #[default]
    Register,
    /// `/display` - all registered users
    Users,
}

impl Route {
    /// Unknown paths fall back to the form
    pub fn from_path(path: &str) -> Route {
        match path.trim_end_matches('/') {
            "/display" | "display" => Route::Users,
            _ => Route::Register,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Register => "/",
            Route::Users => "/display",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Register => "Registration Form",
            Route::Users => "View All Users",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(Route::from_path("/"), Route::Register);
        assert_eq!(Route::from_path("/display"), Route::Users);
        assert_eq!(Route::from_path("/display/"), Route::Users);
        assert_eq!(Route::from_path("/nowhere"), Route::Register);
        assert_eq!(Route::from_path(Route::Users.path()), Route::Users);
    }
}
