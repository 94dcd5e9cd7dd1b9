use shared::domain::{CaseStudy, JournalArticle};

pub const JOURNAL_SECTION: &str = "journal";
pub const CASE_STUDIES_SECTION: &str = "case-studies";
/// Sentinel anchor meaning "document origin" when no element carries the id.
pub const TOP_ANCHOR: &str = "top";

pub const HOME_SECTIONS: &[&str] = &[
    "hero",
    "about",
    CASE_STUDIES_SECTION,
    "team",
    JOURNAL_SECTION,
    "contact",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalPath {
    Root,
    Privacy,
    Terms,
    Insights,
    CaseStudies,
    Media,
}

impl CanonicalPath {
    pub const ALL: [CanonicalPath; 6] = [
        CanonicalPath::Root,
        CanonicalPath::Privacy,
        CanonicalPath::Terms,
        CanonicalPath::Insights,
        CanonicalPath::CaseStudies,
        CanonicalPath::Media,
    ];

    pub fn parse(path: &str) -> Option<Self> {
        match path {
            "/" => Some(Self::Root),
            "/privacy" => Some(Self::Privacy),
            "/terms" => Some(Self::Terms),
            "/insights" => Some(Self::Insights),
            "/case-studies" => Some(Self::CaseStudies),
            "/media" => Some(Self::Media),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Root => "/",
            Self::Privacy => "/privacy",
            Self::Terms => "/terms",
            Self::Insights => "/insights",
            Self::CaseStudies => "/case-studies",
            Self::Media => "/media",
        }
    }

    pub fn view(self) -> ViewState {
        match self {
            Self::Root => ViewState::Home,
            Self::Privacy => ViewState::PrivacyPolicy,
            Self::Terms => ViewState::TermsOfService,
            Self::Insights => ViewState::ArticleList,
            Self::CaseStudies => ViewState::CaseStudyList,
            Self::Media => ViewState::MediaGallery,
        }
    }
}

/// Where a detail view was opened from; "back" returns there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailOrigin {
    Home,
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    Home,
    ArticleDetail,
    ArticleList,
    CaseStudyDetail,
    CaseStudyList,
    MediaGallery,
    PrivacyPolicy,
    TermsOfService,
}

impl PageKind {
    pub const ALL: [PageKind; 8] = [
        PageKind::Home,
        PageKind::ArticleDetail,
        PageKind::ArticleList,
        PageKind::CaseStudyDetail,
        PageKind::CaseStudyList,
        PageKind::MediaGallery,
        PageKind::PrivacyPolicy,
        PageKind::TermsOfService,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::ArticleDetail => "article_detail",
            Self::ArticleList => "article_list",
            Self::CaseStudyDetail => "case_study_detail",
            Self::CaseStudyList => "case_study_list",
            Self::MediaGallery => "media_gallery",
            Self::PrivacyPolicy => "privacy_policy",
            Self::TermsOfService => "terms_of_service",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewState {
    #[default]
    Home,
    ArticleDetail {
        article: JournalArticle,
        origin: DetailOrigin,
    },
    ArticleList,
    CaseStudyDetail {
        study: CaseStudy,
        origin: DetailOrigin,
    },
    CaseStudyList,
    MediaGallery,
    PrivacyPolicy,
    TermsOfService,
}

impl ViewState {
    pub fn kind(&self) -> PageKind {
        match self {
            Self::Home => PageKind::Home,
            Self::ArticleDetail { .. } => PageKind::ArticleDetail,
            Self::ArticleList => PageKind::ArticleList,
            Self::CaseStudyDetail { .. } => PageKind::CaseStudyDetail,
            Self::CaseStudyList => PageKind::CaseStudyList,
            Self::MediaGallery => PageKind::MediaGallery,
            Self::PrivacyPolicy => PageKind::PrivacyPolicy,
            Self::TermsOfService => PageKind::TermsOfService,
        }
    }

    pub fn is_home(&self) -> bool {
        matches!(self, Self::Home)
    }

    /// Detail views have no address of their own.
    pub fn canonical_path(&self) -> Option<CanonicalPath> {
        match self {
            Self::Home => Some(CanonicalPath::Root),
            Self::ArticleList => Some(CanonicalPath::Insights),
            Self::CaseStudyList => Some(CanonicalPath::CaseStudies),
            Self::MediaGallery => Some(CanonicalPath::Media),
            Self::PrivacyPolicy => Some(CanonicalPath::Privacy),
            Self::TermsOfService => Some(CanonicalPath::Terms),
            Self::ArticleDetail { .. } | Self::CaseStudyDetail { .. } => None,
        }
    }
}

pub fn view_for_path(path: &str) -> ViewState {
    CanonicalPath::parse(path)
        .map(CanonicalPath::view)
        .unwrap_or_default()
}

/// Result of an in-app "back": the address to land on and, when landing on
/// Home, the section to bring into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseTarget {
    pub path: CanonicalPath,
    pub section: Option<&'static str>,
}

#[derive(Debug, Default)]
pub struct Navigator {
    view: ViewState,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn reset(&mut self) -> &ViewState {
        self.view = ViewState::Home;
        &self.view
    }

    pub fn apply_path(&mut self, path: &str) -> &ViewState {
        self.reset();
        self.view = view_for_path(path);
        &self.view
    }

    pub fn select_article(&mut self, article: JournalArticle) -> &ViewState {
        let origin = self.detail_origin(PageKind::ArticleList);
        self.reset();
        self.view = ViewState::ArticleDetail { article, origin };
        &self.view
    }

    pub fn select_case_study(&mut self, study: CaseStudy) -> &ViewState {
        let origin = self.detail_origin(PageKind::CaseStudyList);
        self.reset();
        self.view = ViewState::CaseStudyDetail { study, origin };
        &self.view
    }

    pub fn close_target(&self) -> Option<CloseTarget> {
        let home = |section| CloseTarget {
            path: CanonicalPath::Root,
            section: Some(section),
        };
        match &self.view {
            ViewState::Home => None,
            ViewState::ArticleDetail {
                origin: DetailOrigin::List,
                ..
            } => Some(CloseTarget {
                path: CanonicalPath::Insights,
                section: None,
            }),
            ViewState::CaseStudyDetail {
                origin: DetailOrigin::List,
                ..
            } => Some(CloseTarget {
                path: CanonicalPath::CaseStudies,
                section: None,
            }),
            ViewState::ArticleDetail { .. } | ViewState::ArticleList => {
                Some(home(JOURNAL_SECTION))
            }
            ViewState::CaseStudyDetail { .. } | ViewState::CaseStudyList => {
                Some(home(CASE_STUDIES_SECTION))
            }
            ViewState::MediaGallery | ViewState::PrivacyPolicy | ViewState::TermsOfService => {
                Some(home(TOP_ANCHOR))
            }
        }
    }

    // Hopping between details keeps the list as origin.
    fn detail_origin(&self, list: PageKind) -> DetailOrigin {
        match &self.view {
            view if view.kind() == list => DetailOrigin::List,
            ViewState::ArticleDetail { origin, .. } if list == PageKind::ArticleList => *origin,
            ViewState::CaseStudyDetail { origin, .. } if list == PageKind::CaseStudyList => *origin,
            _ => DetailOrigin::Home,
        }
    }
}

#[cfg(test)]
#[path = "tests/navigator_tests.rs"]
mod tests;
