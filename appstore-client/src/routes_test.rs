//! Tests for the route table and the authentication guard.

#[cfg(test)]
mod tests {
    use crate::models::Session;
    use crate::routes::{AppRoute, GuardDecision, guard, post_login_destination, require_auth};
    use shared::models::UserProfile;

    fn anonymous() -> Session {
        Session::default()
    }

    fn authenticated() -> Session {
        Session {
            token: Some("abc".into()),
            user: Some(UserProfile {
                email: Some("a@b.com".into()),
                ..UserProfile::default()
            }),
            ..Session::default()
        }
    }

    /// Tests route recognition for every entry in the table
    #[test]
    fn test_recognize_routes() {
        assert_eq!(AppRoute::recognize("/"), AppRoute::Home);
        assert_eq!(AppRoute::recognize(""), AppRoute::Home);
        assert_eq!(AppRoute::recognize("/home"), AppRoute::Home);
        assert_eq!(AppRoute::recognize("/apps"), AppRoute::Apps);
        assert_eq!(AppRoute::recognize("/apps/"), AppRoute::Apps);
        assert_eq!(
            AppRoute::recognize("/apps/neon-1"),
            AppRoute::AppDetail {
                id: "neon-1".into()
            }
        );
        assert_eq!(AppRoute::recognize("/search?query=foo"), AppRoute::Search);
        assert_eq!(AppRoute::recognize("/login"), AppRoute::Login);
        assert_eq!(AppRoute::recognize("/register"), AppRoute::Register);
        assert_eq!(AppRoute::recognize("/admin"), AppRoute::Admin);
        assert_eq!(AppRoute::recognize("/admin/apps#top"), AppRoute::AdminApps);
        assert_eq!(AppRoute::recognize("/admin/users"), AppRoute::NotFound);
        assert_eq!(AppRoute::recognize("/apps/1/reviews"), AppRoute::NotFound);
    }

    /// Tests that canonical paths recognize back to the same route
    #[test]
    fn test_path_recognition_is_stable() {
        let routes = [
            AppRoute::Home,
            AppRoute::Apps,
            AppRoute::AppDetail { id: "7".into() },
            AppRoute::Search,
            AppRoute::Login,
            AppRoute::Register,
            AppRoute::Admin,
            AppRoute::AdminApps,
        ];
        for route in routes {
            assert_eq!(AppRoute::recognize(&route.path()), route);
        }
    }

    #[test]
    fn test_only_admin_routes_are_protected() {
        assert!(AppRoute::Admin.requires_auth());
        assert!(AppRoute::AdminApps.requires_auth());
        assert!(!AppRoute::Home.requires_auth());
        assert!(!AppRoute::Login.requires_auth());
        assert!(!AppRoute::AppDetail { id: "1".into() }.requires_auth());
    }

    #[test]
    fn test_guard_pending_while_booting() {
        let session = Session::booting(Some("abc".into()));
        assert_eq!(require_auth(&session, "/admin"), GuardDecision::Pending);
        assert_eq!(guard(&session, "/admin/apps"), GuardDecision::Pending);
    }

    #[test]
    fn test_guard_redirects_anonymous_with_origin() {
        assert_eq!(
            guard(&anonymous(), "/admin/apps"),
            GuardDecision::Redirect {
                to: AppRoute::Login,
                from: "/admin/apps".into(),
            }
        );
    }

    #[test]
    fn test_guard_redirects_token_without_user() {
        let session = Session {
            token: Some("stale".into()),
            ..Session::default()
        };
        assert!(matches!(
            guard(&session, "/admin"),
            GuardDecision::Redirect { .. }
        ));
    }

    #[test]
    fn test_guard_allows_authenticated() {
        assert_eq!(guard(&authenticated(), "/admin"), GuardDecision::Allow);
    }

    #[test]
    fn test_public_routes_never_wait() {
        let booting = Session::booting(None);
        assert_eq!(guard(&booting, "/apps"), GuardDecision::Allow);
        assert_eq!(guard(&anonymous(), "/search"), GuardDecision::Allow);
    }

    #[test]
    fn test_post_login_destination() {
        assert_eq!(post_login_destination(None), "/");
        assert_eq!(post_login_destination(Some("/admin/apps")), "/admin/apps");
        assert_eq!(post_login_destination(Some("https://evil.example")), "/");
        assert_eq!(post_login_destination(Some("//evil.example")), "/");
        assert_eq!(post_login_destination(Some("/login")), "/");
    }
}
