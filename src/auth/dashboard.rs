use crate::types::Role;

/// Landing route for a user after login. Admin wins over organizer, which
/// wins over runner, whatever else the user holds.
pub fn dashboard_route(roles: &[Role]) -> &'static str {
    if roles.contains(&Role::Admin) {
        return "/admin/dashboard";
    }
    if roles.contains(&Role::Organizer) {
        return "/organizer/dashboard";
    }
    if roles.contains(&Role::Runner) {
        return "/runner/dashboard";
    }
    "/"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_wins_regardless_of_other_roles() {
        assert_eq!(dashboard_route(&[Role::Admin]), "/admin/dashboard");
        assert_eq!(dashboard_route(&[Role::Runner, Role::Admin]), "/admin/dashboard");
        assert_eq!(
            dashboard_route(&[Role::Organizer, Role::Runner, Role::Admin]),
            "/admin/dashboard"
        );
    }

    #[test]
    fn organizer_beats_runner() {
        assert_eq!(dashboard_route(&[Role::Runner, Role::Organizer]), "/organizer/dashboard");
    }

    #[test]
    fn runner_and_empty() {
        assert_eq!(dashboard_route(&[Role::Runner]), "/runner/dashboard");
        assert_eq!(dashboard_route(&[]), "/");
    }
}
