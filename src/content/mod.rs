//! Static portfolio content.
//!
//! The record is keyed by concern (projects, tech stack, contact ...), never by
//! tile. It is built once at start-up, either from [`ContentRecord::builtin`]
//! or from an operator-authored JSON file, and only read afterwards. Field
//! names serialize in camelCase.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tech: Vec<String>,
    pub demo_url: String,
    pub github_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DsaProfile {
    pub platform: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub preview_image: String,
    pub download_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechCategory {
    pub id: String,
    pub label: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactItem {
    pub id: String,
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicInfo {
    pub headline: String,
    pub subheadline: String,
    pub intro: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub role: String,
    pub image_src: String,
    pub image_alt: String,
}

impl Profile {
    /// Up to two uppercase initials, used by the avatar face.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub projects: Vec<Project>,
    pub dsa_profiles: Vec<DsaProfile>,
    pub resume: Resume,
    pub tech_stack: Vec<TechCategory>,
    pub contact: Vec<ContactItem>,
    pub basic_info: BasicInfo,
    pub profile: Profile,
}

impl ContentRecord {
    pub fn from_json_str(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// Load an operator-authored content file. The schema is trusted beyond
    /// what deserialization checks.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw).map_err(|source| FolioError::Content {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Content shipped with the binary.
    pub fn builtin() -> Self {
        Self {
            projects: vec![
                Project {
                    id: "project-chikitsa".into(),
                    name: "Chikitsa Cloud".into(),
                    description: "A full-stack healthcare records management platform with 35 REST API endpoints across 7 routes: Auth, Users, Medical Records, Medical Analysis, Family Access, Hospital Search, and Feedback. Features OAuth2 with Google Sign-In, JWT token management, UUID-based multi-user data modeling, family access control via QR code scanning and email invitations, OpenStreetMap API integration for hospital discovery, and health metrics validation engine. Deployed on Render with PostgreSQL and Supabase cloud storage.".into(),
                    tech: strings(&["Python", "FastAPI", "PostgreSQL", "Supabase", "JWT", "OAuth2", "Render"]),
                    demo_url: "https://drive.google.com/file/d/10A-i4ca3aM3ZiWz79QTj451qiwctJ6P_/view?usp=sharing".into(),
                    github_url: "https://github.com/aastha-malik/ChikitsaCloud".into(),
                },
                Project {
                    id: "project-blossom".into(),
                    name: "Blossom".into(),
                    description: "A gamified task management platform with 20+ REST API endpoints supporting task CRUD, streaks, XP/points, rewards, user analytics, and team management. Engineered gamification logic including streak tracking, inactivity penalties, and reward tier progression with backend-enforced rules. Implemented multi-method authentication: Google OAuth2, standard JWT auth, and OTP-based password reset. First full-stack project demonstrating end-to-end system design and cloud deployment.".into(),
                    tech: strings(&["Python", "FastAPI", "PostgreSQL", "JWT", "OAuth2", "Render"]),
                    demo_url: "https://blossom-arru.onrender.com/".into(),
                    github_url: "https://github.com/aastha-malik/Blossom".into(),
                },
            ],
            dsa_profiles: vec![
                DsaProfile {
                    platform: "LeetCode".into(),
                    href: "https://leetcode.com/u/aastha_malik/".into(),
                },
                DsaProfile {
                    platform: "NeetCode".into(),
                    href: "https://neetcode.io/profile".into(),
                },
            ],
            resume: Resume {
                preview_image: "/resume-preview.png".into(),
                download_url: "https://drive.google.com/file/d/1SWgH-HdU_yI6a4KM2lqHO_D972ewfebI/view?usp=sharing".into(),
            },
            tech_stack: vec![
                category("languages", "Languages", &["Python"]),
                category("backend", "Frameworks & Libraries", &["FastAPI", "Pydantic", "SQLAlchemy"]),
                category("databases", "Databases", &["PostgreSQL", "Supabase", "SQLite", "MySQL"]),
                category("auth", "Authentication & Security", &["JWT", "OAuth2.0", "Google Sign-In", "bcrypt"]),
                category("cloud", "Cloud & Deployment", &["Render", "Vercel", "Supabase Storage", "AWS S3"]),
                category("apis", "APIs", &["REST API", "OpenStreetMap API"]),
                category("tools", "Developer Tools", &["Git", "GitHub", "Postman", "VS Code", "Swagger UI", "Linux"]),
                category("core", "CS Core", &["DBMS", "OOPs", "Operating Systems", "Computer Networks", "HTTP/HTTPS"]),
                category("client", "Client Integrations", &["React", "TypeScript", "Flutter", "Dart", "Tkinter"]),
            ],
            contact: vec![
                contact("email", "Email", "aasthamalik.work@gmail.com", Some("mailto:aasthamalik.work@gmail.com")),
                contact("phone", "Phone", "+91 7303102064", Some("tel:+917303102064")),
                contact("github", "GitHub", "aastha-malik", Some("https://github.com/aastha-malik")),
                contact("linkedin", "LinkedIn", "aastha-malik-", Some("https://linkedin.com/in/aastha-malik-")),
            ],
            basic_info: BasicInfo {
                headline: "Backend Developer".into(),
                subheadline: "Passionate about solving real-world problems through clean, efficient code and continuously expanding expertise to work on production-grade, scalable products.".into(),
                intro: "Backend developer with hands-on experience building and deploying healthcare and productivity applications. Proficient in Python, FastAPI, PostgreSQL, JWT/OAuth2, and cloud deployment on Render. Fast learner with a growth mindset, actively deep diving into backend development to design secure, scalable REST APIs.".into(),
            },
            profile: Profile {
                name: "Aastha Malik".into(),
                role: "Backend Developer".into(),
                image_src: "/profile.jpg".into(),
                image_alt: "Aastha Malik".into(),
            },
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn category(id: &str, label: &str, items: &[&str]) -> TechCategory {
    TechCategory {
        id: id.into(),
        label: label.into(),
        items: strings(items),
    }
}

fn contact(id: &str, label: &str, value: &str, href: Option<&str>) -> ContactItem {
    ContactItem {
        id: id.into(),
        label: label.into(),
        value: value.into(),
        href: href.map(Into::into),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_survives_json() {
        let builtin = ContentRecord::builtin();
        let raw = builtin.to_json_pretty().unwrap();
        assert!(raw.contains("\"demoUrl\""));
        assert!(raw.contains("\"dsaProfiles\""));
        assert_eq!(ContentRecord::from_json_str(&raw).unwrap(), builtin);
    }

    #[test]
    fn contact_href_is_optional() {
        let raw = r#"{
            "projects": [],
            "dsaProfiles": [],
            "resume": {"previewImage": "/r.png", "downloadUrl": "https://example.com/r"},
            "techStack": [],
            "contact": [{"id": "city", "label": "City", "value": "Delhi"}],
            "basicInfo": {"headline": "h", "subheadline": "s", "intro": "i"},
            "profile": {"name": "Jo Doe", "role": "Dev", "imageSrc": "/p.jpg", "imageAlt": "Jo"}
        }"#;
        let record = ContentRecord::from_json_str(raw).unwrap();
        assert_eq!(record.contact[0].href, None);
        assert_eq!(record.profile.initials(), "JD");
    }

    #[test]
    fn load_reports_path_on_parse_error() {
        let path = std::env::temp_dir().join(format!("bento_folio_bad_{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        let err = ContentRecord::load(&path).unwrap_err();
        assert!(matches!(err, FolioError::Content { .. }));
        assert!(err.to_string().contains("bento_folio_bad_"));
        let _ = std::fs::remove_file(&path);
    }
}
