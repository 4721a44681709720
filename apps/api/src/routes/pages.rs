use serde::{Serialize, Serializer};

/// Browser routes of the SELECTRA front end. The API never renders these; it
/// only names them as redirect targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    CandidateSignup,
    CandidateLogin,
    CvUpload,
    Interview,
    InterviewComplete,
    OrganizationSignup,
    OrganizationLogin,
    OrganizationLanding,
    OrganizationDashboard,
    NotFound,
}

impl Page {
    pub const ALL: [Page; 11] = [
        Page::Home,
        Page::CandidateSignup,
        Page::CandidateLogin,
        Page::CvUpload,
        Page::Interview,
        Page::InterviewComplete,
        Page::OrganizationSignup,
        Page::OrganizationLogin,
        Page::OrganizationLanding,
        Page::OrganizationDashboard,
        Page::NotFound,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::CandidateSignup => "/candidate-signup",
            Page::CandidateLogin => "/candidate-login",
            Page::CvUpload => "/cv-upload",
            Page::Interview => "/interview",
            Page::InterviewComplete => "/interview-complete",
            Page::OrganizationSignup => "/organization-signup",
            Page::OrganizationLogin => "/organization-login",
            Page::OrganizationLanding => "/organization-landing",
            Page::OrganizationDashboard => "/organization-dashboard",
            Page::NotFound => "*",
        }
    }

    /// Resolves a browser path, falling back to the catch-all.
    pub fn resolve(path: &str) -> Page {
        let trimmed = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        Page::ALL
            .into_iter()
            .find(|p| *p != Page::NotFound && p.path() == trimmed)
            .unwrap_or(Page::NotFound)
    }
}

impl Serialize for Page {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_routes() {
        assert_eq!(Page::resolve("/"), Page::Home);
        assert_eq!(Page::resolve("/cv-upload"), Page::CvUpload);
        assert_eq!(Page::resolve("/organization-dashboard/"), Page::OrganizationDashboard);
    }

    #[test]
    fn test_resolve_unknown_route_is_not_found() {
        assert_eq!(Page::resolve("/admin"), Page::NotFound);
        assert_eq!(Page::resolve("*"), Page::NotFound);
    }

    #[test]
    fn test_page_serializes_as_path() {
        let json = serde_json::to_string(&Page::InterviewComplete).unwrap();
        assert_eq!(json, "\"/interview-complete\"");
    }
}
