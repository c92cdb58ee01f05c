//! Shared test fixtures: a canned in-memory `Repository` plus helpers to
//! build the full router with mock storage and mail, so handler behavior is
//! exercised without Postgres, MinIO, or a mail provider.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use corporate_cms::{
    AppConfig, AppState, MockMailer, MockStorageService, create_router,
    models::{
        About, BlogCard, BlogPost, Career, Client, ContactSubmission, DashboardStats,
        JobApplication, Page, PageDocument, Partner, Service, ServiceCard, User,
    },
    repository::{
        AboutDocument, BlogChanges, BlogFilter, CareerChanges, CareerFilter, ClientChanges,
        NewApplication, NewBlogPost, NewCareer, NewClient, NewPartner, NewService, NewSubmission,
        PartnerChanges, Repository, RepositoryState, ServiceChanges, ServiceFilter,
    },
    storage::StorageState,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// Well-known identities for the `x-user-id` development bypass.
pub fn admin_id() -> Uuid {
    Uuid::from_u128(0xA)
}

pub fn editor_id() -> Uuid {
    Uuid::from_u128(0xE)
}

pub fn sample_service(slug: &str) -> Service {
    Service {
        id: Uuid::new_v4(),
        language: "en".to_string(),
        title: "Orthopedic Supply".to_string(),
        slug: slug.to_string(),
        excerpt: Some("Implants and instruments".to_string()),
        featured_image: Some(
            "http://localhost:9000/mock-bucket/uploads/images/old-service.jpg".to_string(),
        ),
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        ..Default::default()
    }
}

pub fn sample_blog(slug: &str) -> BlogPost {
    BlogPost {
        id: Uuid::new_v4(),
        language: "en".to_string(),
        title: "Launch announcement".to_string(),
        excerpt: Some("We launched".to_string()),
        status: "published".to_string(),
        published_at: Some(Utc::now() - Duration::days(1)),
        slug: slug.to_string(),
        reading_time: 5,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        ..Default::default()
    }
}

pub fn sample_career(open: bool) -> Career {
    Career {
        id: Uuid::new_v4(),
        language: "en".to_string(),
        title: "Senior Rust Engineer".to_string(),
        slug: "senior-rust-engineer".to_string(),
        department: "engineering".to_string(),
        job_type: "full-time".to_string(),
        work_type: "remote".to_string(),
        location: "Riyadh".to_string(),
        experience_level: "senior".to_string(),
        application_deadline: if open {
            Utc::now() + Duration::days(30)
        } else {
            Utc::now() - Duration::days(1)
        },
        status: "published".to_string(),
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        ..Default::default()
    }
}

fn blog_card(post: &BlogPost) -> BlogCard {
    BlogCard {
        id: post.id,
        language: post.language.clone(),
        title: post.title.clone(),
        subtitle: post.subtitle.clone(),
        excerpt: post.excerpt.clone(),
        thumbnail: post.thumbnail.clone(),
        featured_image: post.featured_image.clone(),
        status: post.status.clone(),
        published_at: post.published_at,
        slug: post.slug.clone(),
        created_at: post.created_at,
    }
}

/// Canned repository: fixture rows configured per test, write operations echo
/// the row that would have been persisted.
#[derive(Default)]
pub struct StubRepository {
    pub home_page: Option<Page>,
    pub about: Option<About>,
    pub services: Vec<Service>,
    pub blogs: Vec<BlogPost>,
    pub careers: Vec<Career>,
    pub clients: Vec<Client>,
    pub partners: Vec<Partner>,
    /// When true, the contact throttle reports the flood limit as exceeded.
    pub flooded: bool,
}

#[async_trait]
impl Repository for StubRepository {
    async fn get_active_page(
        &self,
        page_type: &str,
        language: &str,
    ) -> Result<Option<Page>, sqlx::Error> {
        Ok(self
            .home_page
            .clone()
            .filter(|p| p.page_type == page_type && p.language == language && p.is_active))
    }

    async fn get_active_page_by_id(&self, id: Uuid) -> Result<Option<Page>, sqlx::Error> {
        Ok(self.home_page.clone().filter(|p| p.id == id && p.is_active))
    }

    async fn get_page_any_status(
        &self,
        page_type: &str,
        language: &str,
    ) -> Result<Option<Page>, sqlx::Error> {
        Ok(self
            .home_page
            .clone()
            .filter(|p| p.page_type == page_type && p.language == language))
    }

    async fn upsert_page(
        &self,
        page_type: &str,
        language: &str,
        doc: PageDocument,
    ) -> Result<Page, sqlx::Error> {
        Ok(Page {
            id: self.home_page.as_ref().map(|p| p.id).unwrap_or_else(Uuid::new_v4),
            page_type: page_type.to_string(),
            language: language.to_string(),
            title: doc.title,
            slug: doc.slug,
            sections: doc.sections,
            seo: doc.seo,
            is_active: doc.is_active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    async fn deactivate_page(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        Ok(self.home_page.as_ref().map(|p| p.id) == Some(id))
    }

    async fn list_services(
        &self,
        filter: ServiceFilter,
    ) -> Result<(Vec<Service>, i64), sqlx::Error> {
        let rows: Vec<Service> = self
            .services
            .iter()
            .filter(|s| filter.include_inactive || s.is_active)
            .cloned()
            .collect();
        let total = rows.len() as i64;
        Ok((rows, total))
    }

    async fn get_service_by_slug(
        &self,
        slug: &str,
        language: &str,
    ) -> Result<Option<Service>, sqlx::Error> {
        Ok(self
            .services
            .iter()
            .find(|s| s.slug == slug && s.language == language && s.is_active)
            .cloned())
    }

    async fn featured_service_cards(
        &self,
        _language: &str,
        limit: i64,
    ) -> Result<Vec<ServiceCard>, sqlx::Error> {
        Ok(self
            .services
            .iter()
            .take(limit as usize)
            .map(|s| ServiceCard {
                id: s.id,
                title: s.title.clone(),
                subtitle: s.subtitle.clone(),
                icon: s.icon.clone(),
                thumbnail: s.thumbnail.clone(),
                slug: s.slug.clone(),
                featured_image: s.featured_image.clone(),
            })
            .collect())
    }

    async fn recent_services(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<Service>, sqlx::Error> {
        Ok(self
            .services
            .iter()
            .filter(|s| s.is_active && s.created_at >= since)
            .cloned()
            .collect())
    }

    async fn get_service(&self, id: Uuid) -> Result<Option<Service>, sqlx::Error> {
        Ok(self.services.iter().find(|s| s.id == id).cloned())
    }

    async fn create_service(&self, data: NewService) -> Result<Service, sqlx::Error> {
        Ok(Service {
            id: Uuid::new_v4(),
            language: data.language,
            title: data.title,
            subtitle: data.subtitle,
            slug: data.slug,
            icon: data.icon,
            thumbnail: data.thumbnail,
            featured_image: data.featured_image,
            excerpt: data.excerpt,
            content: data.content,
            display_order: data.display_order,
            featured: data.featured,
            tags: data.tags,
            seo: data.seo,
            is_active: true,
            views: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    async fn update_service(
        &self,
        id: Uuid,
        changes: ServiceChanges,
    ) -> Result<Option<Service>, sqlx::Error> {
        Ok(self.services.iter().find(|s| s.id == id).map(|existing| {
            let mut updated = existing.clone();
            if let Some(title) = changes.title {
                updated.title = title;
            }
            if let Some(slug) = changes.slug {
                updated.slug = slug;
            }
            if let Some(image) = changes.featured_image {
                updated.featured_image = Some(image);
            }
            if let Some(is_active) = changes.is_active {
                updated.is_active = is_active;
            }
            updated.updated_at = Utc::now();
            updated
        }))
    }

    async fn deactivate_service(&self, id: Uuid) -> Result<Option<Service>, sqlx::Error> {
        Ok(self.services.iter().find(|s| s.id == id).map(|s| {
            let mut row = s.clone();
            row.is_active = false;
            row
        }))
    }

    async fn list_blog_cards(&self, filter: BlogFilter) -> Result<Vec<BlogCard>, sqlx::Error> {
        Ok(self
            .blogs
            .iter()
            .filter(|b| {
                b.language == filter.language
                    && (filter.include_unpublished || (b.status == "published" && b.is_active))
            })
            .map(blog_card)
            .collect())
    }

    async fn get_blog_by_slug(
        &self,
        slug: &str,
        language: &str,
    ) -> Result<Option<BlogPost>, sqlx::Error> {
        Ok(self
            .blogs
            .iter()
            .find(|b| {
                b.slug == slug && b.language == language && b.status == "published" && b.is_active
            })
            .cloned())
    }

    async fn latest_blog_cards(
        &self,
        _language: &str,
        limit: i64,
    ) -> Result<Vec<BlogCard>, sqlx::Error> {
        Ok(self
            .blogs
            .iter()
            .filter(|b| b.status == "published")
            .take(limit as usize)
            .map(blog_card)
            .collect())
    }

    async fn recent_published_blogs(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<BlogPost>, sqlx::Error> {
        Ok(self
            .blogs
            .iter()
            .filter(|b| b.status == "published" && b.published_at.map(|at| at >= since) == Some(true))
            .cloned()
            .collect())
    }

    async fn get_blog(&self, id: Uuid) -> Result<Option<BlogPost>, sqlx::Error> {
        Ok(self.blogs.iter().find(|b| b.id == id).cloned())
    }

    async fn create_blog(&self, data: NewBlogPost) -> Result<BlogPost, sqlx::Error> {
        Ok(BlogPost {
            id: Uuid::new_v4(),
            language: data.language,
            title: data.title,
            subtitle: data.subtitle,
            excerpt: data.excerpt,
            thumbnail: data.thumbnail,
            featured_image: data.featured_image,
            content: data.content,
            status: data.status,
            published_at: data.published_at,
            tags: data.tags,
            reading_time: data.reading_time,
            slug: data.slug,
            seo: data.seo,
            is_active: true,
            views: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    async fn update_blog(
        &self,
        id: Uuid,
        changes: BlogChanges,
    ) -> Result<Option<BlogPost>, sqlx::Error> {
        Ok(self.blogs.iter().find(|b| b.id == id).map(|existing| {
            let mut updated = existing.clone();
            if let Some(title) = changes.title {
                updated.title = title;
            }
            if let Some(status) = changes.status {
                if status == "published" && updated.published_at.is_none() {
                    updated.published_at = Some(Utc::now());
                }
                updated.status = status;
            }
            if let Some(image) = changes.featured_image {
                updated.featured_image = Some(image);
            }
            updated.updated_at = Utc::now();
            updated
        }))
    }

    async fn delete_blog(&self, id: Uuid) -> Result<Option<BlogPost>, sqlx::Error> {
        Ok(self.blogs.iter().find(|b| b.id == id).cloned())
    }

    async fn list_careers(
        &self,
        filter: CareerFilter,
    ) -> Result<(Vec<Career>, i64), sqlx::Error> {
        let rows: Vec<Career> = self
            .careers
            .iter()
            .filter(|c| !filter.only_open || c.is_open())
            .cloned()
            .collect();
        let total = rows.len() as i64;
        Ok((rows, total))
    }

    async fn get_career(&self, id: Uuid) -> Result<Option<Career>, sqlx::Error> {
        Ok(self.careers.iter().find(|c| c.id == id).cloned())
    }

    async fn get_career_by_slug(&self, slug: &str) -> Result<Option<Career>, sqlx::Error> {
        Ok(self.careers.iter().find(|c| c.slug == slug).cloned())
    }

    async fn create_career(&self, data: NewCareer) -> Result<Career, sqlx::Error> {
        Ok(Career {
            id: Uuid::new_v4(),
            language: data.language,
            title: data.title,
            slug: data.slug,
            department: data.department,
            job_type: data.job_type,
            work_type: data.work_type,
            location: data.location,
            experience_level: data.experience_level,
            required_skills: data.required_skills,
            preferred_skills: data.preferred_skills,
            salary: data.salary,
            description: data.description,
            requirements: data.requirements,
            responsibilities: data.responsibilities,
            benefits: data.benefits,
            application_deadline: data.application_deadline,
            status: data.status,
            views: 0,
            seo: data.seo,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    async fn update_career(
        &self,
        id: Uuid,
        changes: CareerChanges,
    ) -> Result<Option<Career>, sqlx::Error> {
        Ok(self.careers.iter().find(|c| c.id == id).map(|existing| {
            let mut updated = existing.clone();
            if let Some(title) = changes.title {
                updated.title = title;
            }
            if let Some(slug) = changes.slug {
                updated.slug = slug;
            }
            if let Some(status) = changes.status {
                updated.status = status;
            }
            updated.updated_at = Utc::now();
            updated
        }))
    }

    async fn delete_career(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        Ok(self.careers.iter().any(|c| c.id == id))
    }

    async fn create_application(
        &self,
        data: NewApplication,
    ) -> Result<JobApplication, sqlx::Error> {
        Ok(JobApplication {
            id: Uuid::new_v4(),
            career_id: data.career_id,
            full_name: data.full_name,
            email: data.email,
            phone: data.phone,
            resume_key: data.resume_key,
            cover_letter: data.cover_letter,
            portfolio_url: data.portfolio_url,
            linkedin_url: data.linkedin_url,
            status: "submitted".to_string(),
            source: "career_portal".to_string(),
            ip_address: data.ip_address,
            user_agent: data.user_agent,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    async fn list_applications(
        &self,
        _career_id: Uuid,
    ) -> Result<Vec<JobApplication>, sqlx::Error> {
        Ok(vec![])
    }

    async fn set_application_status(
        &self,
        _id: Uuid,
        _status: &str,
    ) -> Result<Option<JobApplication>, sqlx::Error> {
        Ok(None)
    }

    async fn recent_submission_count(
        &self,
        _email: &str,
        _ip: Option<&str>,
        _since: DateTime<Utc>,
    ) -> Result<i64, sqlx::Error> {
        Ok(if self.flooded { 10 } else { 0 })
    }

    async fn create_submission(
        &self,
        data: NewSubmission,
    ) -> Result<ContactSubmission, sqlx::Error> {
        Ok(ContactSubmission {
            id: Uuid::new_v4(),
            name: data.name,
            email: data.email,
            phone: data.phone,
            subject: data.subject,
            message: data.message,
            status: "new".to_string(),
            response_message: None,
            responded_at: None,
            ip_address: data.ip_address,
            user_agent: data.user_agent,
            referrer: data.referrer,
            created_at: Utc::now(),
        })
    }

    async fn list_submissions(
        &self,
        _status: Option<String>,
        _page: i64,
        _limit: i64,
    ) -> Result<(Vec<ContactSubmission>, i64), sqlx::Error> {
        Ok((vec![], 0))
    }

    async fn respond_to_submission(
        &self,
        _id: Uuid,
        _status: &str,
        _response: Option<String>,
    ) -> Result<Option<ContactSubmission>, sqlx::Error> {
        Ok(None)
    }

    async fn contact_emails(&self) -> Result<Vec<String>, sqlx::Error> {
        Ok(vec!["subscriber@example.com".to_string()])
    }

    async fn list_clients(&self) -> Result<Vec<Client>, sqlx::Error> {
        Ok(self.clients.clone())
    }

    async fn get_client(&self, id: Uuid) -> Result<Option<Client>, sqlx::Error> {
        Ok(self.clients.iter().find(|c| c.id == id).cloned())
    }

    async fn create_client(&self, data: NewClient) -> Result<Client, sqlx::Error> {
        Ok(Client {
            id: Uuid::new_v4(),
            name: data.name,
            logo: data.logo,
            brief: data.brief,
            url: data.url,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    async fn update_client(
        &self,
        id: Uuid,
        changes: ClientChanges,
    ) -> Result<Option<Client>, sqlx::Error> {
        Ok(self.clients.iter().find(|c| c.id == id).map(|existing| {
            let mut updated = existing.clone();
            if let Some(logo) = changes.logo {
                updated.logo = logo;
            }
            updated
        }))
    }

    async fn delete_client(&self, id: Uuid) -> Result<Option<Client>, sqlx::Error> {
        Ok(self.clients.iter().find(|c| c.id == id).cloned())
    }

    async fn list_partners(&self) -> Result<Vec<Partner>, sqlx::Error> {
        Ok(self.partners.clone())
    }

    async fn get_partner(&self, id: Uuid) -> Result<Option<Partner>, sqlx::Error> {
        Ok(self.partners.iter().find(|p| p.id == id).cloned())
    }

    async fn create_partner(&self, data: NewPartner) -> Result<Partner, sqlx::Error> {
        Ok(Partner {
            id: Uuid::new_v4(),
            name: data.name,
            slug: data.slug,
            logo: data.logo,
            brief: data.brief,
            url: data.url,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    async fn update_partner(
        &self,
        id: Uuid,
        changes: PartnerChanges,
    ) -> Result<Option<Partner>, sqlx::Error> {
        Ok(self.partners.iter().find(|p| p.id == id).map(|existing| {
            let mut updated = existing.clone();
            if let Some(logo) = changes.logo {
                updated.logo = logo;
            }
            updated
        }))
    }

    async fn delete_partner(&self, id: Uuid) -> Result<Option<Partner>, sqlx::Error> {
        Ok(self.partners.iter().find(|p| p.id == id).cloned())
    }

    async fn get_about(&self, language: &str) -> Result<Option<About>, sqlx::Error> {
        Ok(self.about.clone().filter(|a| a.language == language))
    }

    async fn upsert_about(
        &self,
        language: &str,
        doc: AboutDocument,
    ) -> Result<About, sqlx::Error> {
        Ok(About {
            id: Uuid::new_v4(),
            language: language.to_string(),
            title: doc.title,
            image: doc.image,
            content: doc.content,
            features: doc.features.unwrap_or_else(|| json!([])),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        if id == admin_id() {
            Ok(Some(User {
                id,
                email: "admin@example.com".to_string(),
                role: "admin".to_string(),
            }))
        } else if id == editor_id() {
            Ok(Some(User {
                id,
                email: "editor@example.com".to_string(),
                role: "editor".to_string(),
            }))
        } else {
            Ok(None)
        }
    }

    async fn create_user(&self, user: User) -> Result<User, sqlx::Error> {
        Ok(user)
    }

    async fn get_stats(&self) -> Result<DashboardStats, sqlx::Error> {
        Ok(DashboardStats {
            total_pages: 1,
            total_services: self.services.len() as i64,
            total_blogs: self.blogs.len() as i64,
            total_careers: self.careers.len() as i64,
            new_submissions: 0,
            submitted_applications: 0,
        })
    }
}

/// Router over the stub repository plus mock storage and mail. Returns the
/// mocks so tests can assert on deletions and captured email.
pub fn app_with(
    repo: StubRepository,
) -> (axum::Router, Arc<MockStorageService>, Arc<MockMailer>) {
    let storage = Arc::new(MockStorageService::new());
    let mailer = Arc::new(MockMailer::new());
    let state = AppState {
        repo: Arc::new(repo) as RepositoryState,
        storage: storage.clone() as StorageState,
        mailer: mailer.clone(),
        config: AppConfig::default(),
    };
    (create_router(state), storage, mailer)
}

pub fn app(repo: StubRepository) -> axum::Router {
    app_with(repo).0
}
