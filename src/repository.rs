use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{PgPool, query_builder::QueryBuilder};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{
    About, BlogCard, BlogPost, Career, Client, ContactSubmission, DashboardStats, ImageAsset,
    JobApplication, Page, PageDocument, Partner, Salary, Seo, Service, ServiceCard, User,
};

/// True when the error is a Postgres unique-constraint violation; used by
/// handlers that want a friendlier 409 message than the generic mapping.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

// --- Filters (built by handlers from query params) ---

#[derive(Debug, Clone)]
pub struct ServiceFilter {
    pub language: String,
    pub page: i64,
    pub limit: i64,
    pub featured: Option<bool>,
    pub tag: Option<String>,
    pub search: Option<String>,
    /// Admin listings include soft-deleted rows.
    pub include_inactive: bool,
}

#[derive(Debug, Clone)]
pub struct BlogFilter {
    pub language: String,
    pub tag: Option<String>,
    pub search: Option<String>,
    /// Admin listings include drafts and archived posts.
    pub include_unpublished: bool,
}

#[derive(Debug, Clone)]
pub struct CareerFilter {
    pub language: Option<String>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub page: i64,
    pub limit: i64,
    /// Public listings only show published postings with open deadlines.
    pub only_open: bool,
}

// --- Write models (fully resolved by handlers: slugs derived, upload keys
// already turned into public URLs) ---

#[derive(Debug, Clone, Default)]
pub struct NewService {
    pub language: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub slug: String,
    pub icon: Option<String>,
    pub thumbnail: Option<String>,
    pub featured_image: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub display_order: i32,
    pub featured: bool,
    pub tags: Vec<String>,
    pub seo: Option<Json<Seo>>,
}

#[derive(Debug, Clone, Default)]
pub struct ServiceChanges {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub slug: Option<String>,
    pub icon: Option<String>,
    pub thumbnail: Option<String>,
    pub featured_image: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub display_order: Option<i32>,
    pub featured: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub seo: Option<Json<Seo>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct NewBlogPost {
    pub language: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub excerpt: Option<String>,
    pub thumbnail: Option<String>,
    pub featured_image: Option<String>,
    pub content: Option<Value>,
    pub status: String,
    pub published_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub reading_time: i32,
    pub slug: String,
    pub seo: Option<Json<Seo>>,
}

#[derive(Debug, Clone, Default)]
pub struct BlogChanges {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub excerpt: Option<String>,
    pub thumbnail: Option<String>,
    pub featured_image: Option<String>,
    pub content: Option<Value>,
    pub status: Option<String>,
    pub tags: Option<Vec<String>>,
    pub reading_time: Option<i32>,
    pub seo: Option<Json<Seo>>,
}

#[derive(Debug, Clone, Default)]
pub struct NewCareer {
    pub language: String,
    pub title: String,
    pub slug: String,
    pub department: String,
    pub job_type: String,
    pub work_type: String,
    pub location: String,
    pub experience_level: String,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub salary: Option<Json<Salary>>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub responsibilities: Option<String>,
    pub benefits: Option<String>,
    pub application_deadline: DateTime<Utc>,
    pub status: String,
    pub seo: Option<Json<Seo>>,
}

#[derive(Debug, Clone, Default)]
pub struct CareerChanges {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub department: Option<String>,
    pub job_type: Option<String>,
    pub work_type: Option<String>,
    pub location: Option<String>,
    pub experience_level: Option<String>,
    pub required_skills: Option<Vec<String>>,
    pub preferred_skills: Option<Vec<String>>,
    pub salary: Option<Json<Salary>>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub responsibilities: Option<String>,
    pub benefits: Option<String>,
    pub application_deadline: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub seo: Option<Json<Seo>>,
}

#[derive(Debug, Clone, Default)]
pub struct NewApplication {
    pub career_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub resume_key: String,
    pub cover_letter: Option<String>,
    pub portfolio_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewSubmission {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewClient {
    pub name: String,
    pub logo: String,
    pub brief: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ClientChanges {
    pub name: Option<String>,
    pub logo: Option<String>,
    pub brief: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewPartner {
    pub name: String,
    pub slug: String,
    pub logo: String,
    pub brief: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PartnerChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub logo: Option<String>,
    pub brief: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AboutDocument {
    pub title: String,
    pub image: Option<Json<ImageAsset>>,
    pub content: Option<Value>,
    pub features: Option<Value>,
}

/// Repository
///
/// The abstract contract for all persistence operations, shared across the
/// application as `Arc<dyn Repository>` so handlers never see the concrete
/// backend and tests can substitute a stub.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Pages ---
    async fn get_active_page(
        &self,
        page_type: &str,
        language: &str,
    ) -> Result<Option<Page>, sqlx::Error>;
    async fn get_active_page_by_id(&self, id: Uuid) -> Result<Option<Page>, sqlx::Error>;
    /// Upsert-scoped read: also returns inactive pages so an update can
    /// merge over (and reactivate) a deactivated document.
    async fn get_page_any_status(
        &self,
        page_type: &str,
        language: &str,
    ) -> Result<Option<Page>, sqlx::Error>;
    async fn upsert_page(
        &self,
        page_type: &str,
        language: &str,
        doc: PageDocument,
    ) -> Result<Page, sqlx::Error>;
    async fn deactivate_page(&self, id: Uuid) -> Result<bool, sqlx::Error>;

    // --- Services ---
    async fn list_services(&self, filter: ServiceFilter)
    -> Result<(Vec<Service>, i64), sqlx::Error>;
    /// Public read; increments the view counter in the same statement.
    async fn get_service_by_slug(
        &self,
        slug: &str,
        language: &str,
    ) -> Result<Option<Service>, sqlx::Error>;
    async fn featured_service_cards(
        &self,
        language: &str,
        limit: i64,
    ) -> Result<Vec<ServiceCard>, sqlx::Error>;
    async fn recent_services(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<Service>, sqlx::Error>;
    /// Admin read by id, regardless of active status.
    async fn get_service(&self, id: Uuid) -> Result<Option<Service>, sqlx::Error>;
    async fn create_service(&self, data: NewService) -> Result<Service, sqlx::Error>;
    async fn update_service(
        &self,
        id: Uuid,
        changes: ServiceChanges,
    ) -> Result<Option<Service>, sqlx::Error>;
    /// Soft delete; returns the row so the handler can clean up the image.
    async fn deactivate_service(&self, id: Uuid) -> Result<Option<Service>, sqlx::Error>;

    // --- Blogs ---
    async fn list_blog_cards(&self, filter: BlogFilter) -> Result<Vec<BlogCard>, sqlx::Error>;
    /// Public read; increments the view counter in the same statement.
    async fn get_blog_by_slug(
        &self,
        slug: &str,
        language: &str,
    ) -> Result<Option<BlogPost>, sqlx::Error>;
    async fn latest_blog_cards(
        &self,
        language: &str,
        limit: i64,
    ) -> Result<Vec<BlogCard>, sqlx::Error>;
    async fn recent_published_blogs(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<BlogPost>, sqlx::Error>;
    /// Admin read by id, regardless of status.
    async fn get_blog(&self, id: Uuid) -> Result<Option<BlogPost>, sqlx::Error>;
    async fn create_blog(&self, data: NewBlogPost) -> Result<BlogPost, sqlx::Error>;
    /// Partial update. Stamps `published_at` on the first transition to
    /// `published`; later updates never reset it.
    async fn update_blog(
        &self,
        id: Uuid,
        changes: BlogChanges,
    ) -> Result<Option<BlogPost>, sqlx::Error>;
    /// Hard delete; returns the row so the handler can clean up the image.
    async fn delete_blog(&self, id: Uuid) -> Result<Option<BlogPost>, sqlx::Error>;

    // --- Careers ---
    async fn list_careers(&self, filter: CareerFilter)
    -> Result<(Vec<Career>, i64), sqlx::Error>;
    async fn get_career(&self, id: Uuid) -> Result<Option<Career>, sqlx::Error>;
    async fn get_career_by_slug(&self, slug: &str) -> Result<Option<Career>, sqlx::Error>;
    async fn create_career(&self, data: NewCareer) -> Result<Career, sqlx::Error>;
    async fn update_career(
        &self,
        id: Uuid,
        changes: CareerChanges,
    ) -> Result<Option<Career>, sqlx::Error>;
    async fn delete_career(&self, id: Uuid) -> Result<bool, sqlx::Error>;

    // --- Job applications ---
    /// Unique on (career_id, email); violations bubble up for the handler's
    /// duplicate-application message.
    async fn create_application(
        &self,
        data: NewApplication,
    ) -> Result<JobApplication, sqlx::Error>;
    async fn list_applications(
        &self,
        career_id: Uuid,
    ) -> Result<Vec<JobApplication>, sqlx::Error>;
    async fn set_application_status(
        &self,
        id: Uuid,
        status: &str,
    ) -> Result<Option<JobApplication>, sqlx::Error>;

    // --- Contact ---
    async fn recent_submission_count(
        &self,
        email: &str,
        ip: Option<&str>,
        since: DateTime<Utc>,
    ) -> Result<i64, sqlx::Error>;
    async fn create_submission(
        &self,
        data: NewSubmission,
    ) -> Result<ContactSubmission, sqlx::Error>;
    async fn list_submissions(
        &self,
        status: Option<String>,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<ContactSubmission>, i64), sqlx::Error>;
    async fn respond_to_submission(
        &self,
        id: Uuid,
        status: &str,
        response: Option<String>,
    ) -> Result<Option<ContactSubmission>, sqlx::Error>;
    /// Distinct submitter emails; the newsletter recipient list.
    async fn contact_emails(&self) -> Result<Vec<String>, sqlx::Error>;

    // --- Clients & partners ---
    async fn list_clients(&self) -> Result<Vec<Client>, sqlx::Error>;
    async fn get_client(&self, id: Uuid) -> Result<Option<Client>, sqlx::Error>;
    async fn create_client(&self, data: NewClient) -> Result<Client, sqlx::Error>;
    async fn update_client(
        &self,
        id: Uuid,
        changes: ClientChanges,
    ) -> Result<Option<Client>, sqlx::Error>;
    async fn delete_client(&self, id: Uuid) -> Result<Option<Client>, sqlx::Error>;
    async fn list_partners(&self) -> Result<Vec<Partner>, sqlx::Error>;
    async fn get_partner(&self, id: Uuid) -> Result<Option<Partner>, sqlx::Error>;
    async fn create_partner(&self, data: NewPartner) -> Result<Partner, sqlx::Error>;
    async fn update_partner(
        &self,
        id: Uuid,
        changes: PartnerChanges,
    ) -> Result<Option<Partner>, sqlx::Error>;
    async fn delete_partner(&self, id: Uuid) -> Result<Option<Partner>, sqlx::Error>;

    // --- About ---
    async fn get_about(&self, language: &str) -> Result<Option<About>, sqlx::Error>;
    async fn upsert_about(
        &self,
        language: &str,
        doc: AboutDocument,
    ) -> Result<About, sqlx::Error>;

    // --- Profiles ---
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, sqlx::Error>;
    async fn create_user(&self, user: User) -> Result<User, sqlx::Error>;

    // --- Dashboard ---
    async fn get_stats(&self) -> Result<DashboardStats, sqlx::Error>;
}

/// Shared handle to the persistence layer inside the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// Concrete `Repository` backed by the PostgreSQL pool. Dynamic filters go
/// through `QueryBuilder` with bound parameters only; partial updates use
/// `COALESCE` so a single statement covers every combination of provided
/// fields.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SERVICE_COLUMNS: &str = "id, language, title, subtitle, slug, icon, thumbnail, \
                               featured_image, excerpt, content, display_order, featured, tags, \
                               seo, is_active, views, created_at, updated_at";

const BLOG_CARD_COLUMNS: &str = "id, language, title, subtitle, excerpt, thumbnail, \
                                 featured_image, status, published_at, slug, created_at";

fn page_window(page: i64, limit: i64) -> (i64, i64) {
    let limit = limit.clamp(1, 100);
    let page = page.max(1);
    (limit, (page - 1) * limit)
}

#[async_trait]
impl Repository for PostgresRepository {
    // --- Pages ---

    async fn get_active_page(
        &self,
        page_type: &str,
        language: &str,
    ) -> Result<Option<Page>, sqlx::Error> {
        sqlx::query_as::<_, Page>(
            "SELECT * FROM pages WHERE page_type = $1 AND language = $2 AND is_active = TRUE",
        )
        .bind(page_type)
        .bind(language)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_active_page_by_id(&self, id: Uuid) -> Result<Option<Page>, sqlx::Error> {
        sqlx::query_as::<_, Page>("SELECT * FROM pages WHERE id = $1 AND is_active = TRUE")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_page_any_status(
        &self,
        page_type: &str,
        language: &str,
    ) -> Result<Option<Page>, sqlx::Error> {
        sqlx::query_as::<_, Page>("SELECT * FROM pages WHERE page_type = $1 AND language = $2")
            .bind(page_type)
            .bind(language)
            .fetch_optional(&self.pool)
            .await
    }

    async fn upsert_page(
        &self,
        page_type: &str,
        language: &str,
        doc: PageDocument,
    ) -> Result<Page, sqlx::Error> {
        sqlx::query_as::<_, Page>(
            r#"
            INSERT INTO pages (id, page_type, language, title, slug, sections, seo, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), NOW())
            ON CONFLICT (page_type, language) DO UPDATE SET
                title = COALESCE(EXCLUDED.title, pages.title),
                slug = COALESCE(EXCLUDED.slug, pages.slug),
                sections = EXCLUDED.sections,
                seo = COALESCE(EXCLUDED.seo, pages.seo),
                is_active = EXCLUDED.is_active,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(page_type)
        .bind(language)
        .bind(doc.title)
        .bind(doc.slug)
        .bind(doc.sections)
        .bind(doc.seo)
        .bind(doc.is_active)
        .fetch_one(&self.pool)
        .await
    }

    async fn deactivate_page(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE pages SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Services ---

    async fn list_services(
        &self,
        filter: ServiceFilter,
    ) -> Result<(Vec<Service>, i64), sqlx::Error> {
        fn push_filters(builder: &mut QueryBuilder<'_, sqlx::Postgres>, filter: &ServiceFilter) {
            builder.push(" WHERE language = ");
            builder.push_bind(filter.language.clone());
            if !filter.include_inactive {
                builder.push(" AND is_active = TRUE");
            }
            if let Some(featured) = filter.featured {
                builder.push(" AND featured = ");
                builder.push_bind(featured);
            }
            if let Some(tag) = &filter.tag {
                builder.push(" AND ");
                builder.push_bind(tag.clone());
                builder.push(" = ANY(tags)");
            }
            if let Some(search) = &filter.search {
                let pattern = format!("%{search}%");
                builder.push(" AND (title ILIKE ");
                builder.push_bind(pattern.clone());
                builder.push(" OR subtitle ILIKE ");
                builder.push_bind(pattern.clone());
                builder.push(" OR excerpt ILIKE ");
                builder.push_bind(pattern.clone());
                builder.push(" OR content ILIKE ");
                builder.push_bind(pattern);
                builder.push(")");
            }
        }

        let mut count_builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM services");
        push_filters(&mut count_builder, &filter);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new(format!("SELECT {SERVICE_COLUMNS} FROM services"));
        push_filters(&mut builder, &filter);
        builder.push(" ORDER BY display_order ASC, created_at DESC");
        let (limit, offset) = page_window(filter.page, filter.limit);
        builder.push(" LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let services = builder
            .build_query_as::<Service>()
            .fetch_all(&self.pool)
            .await?;
        Ok((services, total))
    }

    async fn get_service_by_slug(
        &self,
        slug: &str,
        language: &str,
    ) -> Result<Option<Service>, sqlx::Error> {
        sqlx::query_as::<_, Service>(
            "UPDATE services SET views = views + 1 \
             WHERE slug = $1 AND language = $2 AND is_active = TRUE RETURNING *",
        )
        .bind(slug)
        .bind(language)
        .fetch_optional(&self.pool)
        .await
    }

    async fn featured_service_cards(
        &self,
        language: &str,
        limit: i64,
    ) -> Result<Vec<ServiceCard>, sqlx::Error> {
        sqlx::query_as::<_, ServiceCard>(
            "SELECT id, title, subtitle, icon, thumbnail, slug, featured_image FROM services \
             WHERE is_active = TRUE AND language = $1 \
             ORDER BY featured DESC, display_order ASC, created_at DESC LIMIT $2",
        )
        .bind(language)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn recent_services(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<Service>, sqlx::Error> {
        sqlx::query_as::<_, Service>(
            "SELECT * FROM services WHERE is_active = TRUE AND created_at >= $1 \
             ORDER BY created_at DESC",
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_service(&self, id: Uuid) -> Result<Option<Service>, sqlx::Error> {
        sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn create_service(&self, data: NewService) -> Result<Service, sqlx::Error> {
        sqlx::query_as::<_, Service>(
            r#"
            INSERT INTO services (id, language, title, subtitle, slug, icon, thumbnail,
                                  featured_image, excerpt, content, display_order, featured,
                                  tags, seo, is_active, views, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, TRUE, 0, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.language)
        .bind(data.title)
        .bind(data.subtitle)
        .bind(data.slug)
        .bind(data.icon)
        .bind(data.thumbnail)
        .bind(data.featured_image)
        .bind(data.excerpt)
        .bind(data.content)
        .bind(data.display_order)
        .bind(data.featured)
        .bind(data.tags)
        .bind(data.seo)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_service(
        &self,
        id: Uuid,
        changes: ServiceChanges,
    ) -> Result<Option<Service>, sqlx::Error> {
        sqlx::query_as::<_, Service>(
            r#"
            UPDATE services SET
                title = COALESCE($2, title),
                subtitle = COALESCE($3, subtitle),
                slug = COALESCE($4, slug),
                icon = COALESCE($5, icon),
                thumbnail = COALESCE($6, thumbnail),
                featured_image = COALESCE($7, featured_image),
                excerpt = COALESCE($8, excerpt),
                content = COALESCE($9, content),
                display_order = COALESCE($10, display_order),
                featured = COALESCE($11, featured),
                tags = COALESCE($12, tags),
                seo = COALESCE($13, seo),
                is_active = COALESCE($14, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.subtitle)
        .bind(changes.slug)
        .bind(changes.icon)
        .bind(changes.thumbnail)
        .bind(changes.featured_image)
        .bind(changes.excerpt)
        .bind(changes.content)
        .bind(changes.display_order)
        .bind(changes.featured)
        .bind(changes.tags)
        .bind(changes.seo)
        .bind(changes.is_active)
        .fetch_optional(&self.pool)
        .await
    }

    async fn deactivate_service(&self, id: Uuid) -> Result<Option<Service>, sqlx::Error> {
        sqlx::query_as::<_, Service>(
            "UPDATE services SET is_active = FALSE, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    // --- Blogs ---

    async fn list_blog_cards(&self, filter: BlogFilter) -> Result<Vec<BlogCard>, sqlx::Error> {
        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new(format!("SELECT {BLOG_CARD_COLUMNS} FROM blogs WHERE language = "));
        builder.push_bind(filter.language);
        if !filter.include_unpublished {
            builder.push(" AND status = 'published' AND is_active = TRUE");
        }
        if let Some(tag) = filter.tag {
            builder.push(" AND ");
            builder.push_bind(tag);
            builder.push(" = ANY(tags)");
        }
        if let Some(search) = filter.search {
            let pattern = format!("%{search}%");
            builder.push(" AND (title ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR subtitle ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR excerpt ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }
        builder.push(" ORDER BY created_at DESC");

        builder.build_query_as::<BlogCard>().fetch_all(&self.pool).await
    }

    async fn get_blog_by_slug(
        &self,
        slug: &str,
        language: &str,
    ) -> Result<Option<BlogPost>, sqlx::Error> {
        sqlx::query_as::<_, BlogPost>(
            "UPDATE blogs SET views = views + 1 \
             WHERE slug = $1 AND language = $2 AND status = 'published' AND is_active = TRUE \
             RETURNING *",
        )
        .bind(slug)
        .bind(language)
        .fetch_optional(&self.pool)
        .await
    }

    async fn latest_blog_cards(
        &self,
        language: &str,
        limit: i64,
    ) -> Result<Vec<BlogCard>, sqlx::Error> {
        sqlx::query_as::<_, BlogCard>(&format!(
            "SELECT {BLOG_CARD_COLUMNS} FROM blogs \
             WHERE language = $1 AND status = 'published' AND is_active = TRUE \
             ORDER BY published_at DESC NULLS LAST LIMIT $2"
        ))
        .bind(language)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn recent_published_blogs(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<BlogPost>, sqlx::Error> {
        sqlx::query_as::<_, BlogPost>(
            "SELECT * FROM blogs \
             WHERE status = 'published' AND is_active = TRUE AND published_at >= $1 \
             ORDER BY published_at DESC",
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_blog(&self, id: Uuid) -> Result<Option<BlogPost>, sqlx::Error> {
        sqlx::query_as::<_, BlogPost>("SELECT * FROM blogs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn create_blog(&self, data: NewBlogPost) -> Result<BlogPost, sqlx::Error> {
        sqlx::query_as::<_, BlogPost>(
            r#"
            INSERT INTO blogs (id, language, title, subtitle, excerpt, thumbnail, featured_image,
                               content, status, published_at, tags, reading_time, slug, seo,
                               is_active, views, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, TRUE, 0, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.language)
        .bind(data.title)
        .bind(data.subtitle)
        .bind(data.excerpt)
        .bind(data.thumbnail)
        .bind(data.featured_image)
        .bind(data.content)
        .bind(data.status)
        .bind(data.published_at)
        .bind(data.tags)
        .bind(data.reading_time)
        .bind(data.slug)
        .bind(data.seo)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_blog(
        &self,
        id: Uuid,
        changes: BlogChanges,
    ) -> Result<Option<BlogPost>, sqlx::Error> {
        // published_at is stamped when the status lands on 'published' and
        // the column is still NULL; it is never reset afterwards.
        sqlx::query_as::<_, BlogPost>(
            r#"
            UPDATE blogs SET
                title = COALESCE($2, title),
                subtitle = COALESCE($3, subtitle),
                excerpt = COALESCE($4, excerpt),
                thumbnail = COALESCE($5, thumbnail),
                featured_image = COALESCE($6, featured_image),
                content = COALESCE($7, content),
                status = COALESCE($8, status),
                published_at = CASE
                    WHEN COALESCE($8, status) = 'published' AND published_at IS NULL THEN NOW()
                    ELSE published_at
                END,
                tags = COALESCE($9, tags),
                reading_time = COALESCE($10, reading_time),
                seo = COALESCE($11, seo),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.subtitle)
        .bind(changes.excerpt)
        .bind(changes.thumbnail)
        .bind(changes.featured_image)
        .bind(changes.content)
        .bind(changes.status)
        .bind(changes.tags)
        .bind(changes.reading_time)
        .bind(changes.seo)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_blog(&self, id: Uuid) -> Result<Option<BlogPost>, sqlx::Error> {
        sqlx::query_as::<_, BlogPost>("DELETE FROM blogs WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    // --- Careers ---

    async fn list_careers(
        &self,
        filter: CareerFilter,
    ) -> Result<(Vec<Career>, i64), sqlx::Error> {
        fn push_filters(builder: &mut QueryBuilder<'_, sqlx::Postgres>, filter: &CareerFilter) {
            builder.push(" WHERE TRUE");
            if let Some(language) = &filter.language {
                builder.push(" AND language = ");
                builder.push_bind(language.clone());
            }
            if filter.only_open {
                builder.push(" AND status = 'published' AND application_deadline >= NOW()");
            } else if let Some(status) = &filter.status {
                builder.push(" AND status = ");
                builder.push_bind(status.clone());
            }
            if let Some(search) = &filter.search {
                let pattern = format!("%{search}%");
                builder.push(" AND (title ILIKE ");
                builder.push_bind(pattern.clone());
                builder.push(" OR description ILIKE ");
                builder.push_bind(pattern.clone());
                builder.push(" OR location ILIKE ");
                builder.push_bind(pattern.clone());
                builder.push(" OR department ILIKE ");
                builder.push_bind(pattern);
                builder.push(")");
            }
        }

        let mut count_builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM careers");
        push_filters(&mut count_builder, &filter);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("SELECT * FROM careers");
        push_filters(&mut builder, &filter);
        builder.push(" ORDER BY created_at DESC");
        let (limit, offset) = page_window(filter.page, filter.limit);
        builder.push(" LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let careers = builder
            .build_query_as::<Career>()
            .fetch_all(&self.pool)
            .await?;
        Ok((careers, total))
    }

    async fn get_career(&self, id: Uuid) -> Result<Option<Career>, sqlx::Error> {
        sqlx::query_as::<_, Career>("SELECT * FROM careers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_career_by_slug(&self, slug: &str) -> Result<Option<Career>, sqlx::Error> {
        sqlx::query_as::<_, Career>("SELECT * FROM careers WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
    }

    async fn create_career(&self, data: NewCareer) -> Result<Career, sqlx::Error> {
        sqlx::query_as::<_, Career>(
            r#"
            INSERT INTO careers (id, language, title, slug, department, job_type, work_type,
                                 location, experience_level, required_skills, preferred_skills,
                                 salary, description, requirements, responsibilities, benefits,
                                 application_deadline, status, views, seo, is_active,
                                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                    $17, $18, 0, $19, TRUE, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.language)
        .bind(data.title)
        .bind(data.slug)
        .bind(data.department)
        .bind(data.job_type)
        .bind(data.work_type)
        .bind(data.location)
        .bind(data.experience_level)
        .bind(data.required_skills)
        .bind(data.preferred_skills)
        .bind(data.salary)
        .bind(data.description)
        .bind(data.requirements)
        .bind(data.responsibilities)
        .bind(data.benefits)
        .bind(data.application_deadline)
        .bind(data.status)
        .bind(data.seo)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_career(
        &self,
        id: Uuid,
        changes: CareerChanges,
    ) -> Result<Option<Career>, sqlx::Error> {
        sqlx::query_as::<_, Career>(
            r#"
            UPDATE careers SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                department = COALESCE($4, department),
                job_type = COALESCE($5, job_type),
                work_type = COALESCE($6, work_type),
                location = COALESCE($7, location),
                experience_level = COALESCE($8, experience_level),
                required_skills = COALESCE($9, required_skills),
                preferred_skills = COALESCE($10, preferred_skills),
                salary = COALESCE($11, salary),
                description = COALESCE($12, description),
                requirements = COALESCE($13, requirements),
                responsibilities = COALESCE($14, responsibilities),
                benefits = COALESCE($15, benefits),
                application_deadline = COALESCE($16, application_deadline),
                status = COALESCE($17, status),
                seo = COALESCE($18, seo),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.slug)
        .bind(changes.department)
        .bind(changes.job_type)
        .bind(changes.work_type)
        .bind(changes.location)
        .bind(changes.experience_level)
        .bind(changes.required_skills)
        .bind(changes.preferred_skills)
        .bind(changes.salary)
        .bind(changes.description)
        .bind(changes.requirements)
        .bind(changes.responsibilities)
        .bind(changes.benefits)
        .bind(changes.application_deadline)
        .bind(changes.status)
        .bind(changes.seo)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_career(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM careers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Job applications ---

    async fn create_application(
        &self,
        data: NewApplication,
    ) -> Result<JobApplication, sqlx::Error> {
        sqlx::query_as::<_, JobApplication>(
            r#"
            INSERT INTO job_applications (id, career_id, full_name, email, phone, resume_key,
                                          cover_letter, portfolio_url, linkedin_url, status,
                                          source, ip_address, user_agent, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'submitted', 'career_portal', $10, $11,
                    NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.career_id)
        .bind(data.full_name)
        .bind(data.email)
        .bind(data.phone)
        .bind(data.resume_key)
        .bind(data.cover_letter)
        .bind(data.portfolio_url)
        .bind(data.linkedin_url)
        .bind(data.ip_address)
        .bind(data.user_agent)
        .fetch_one(&self.pool)
        .await
    }

    async fn list_applications(
        &self,
        career_id: Uuid,
    ) -> Result<Vec<JobApplication>, sqlx::Error> {
        sqlx::query_as::<_, JobApplication>(
            "SELECT * FROM job_applications WHERE career_id = $1 ORDER BY created_at DESC",
        )
        .bind(career_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn set_application_status(
        &self,
        id: Uuid,
        status: &str,
    ) -> Result<Option<JobApplication>, sqlx::Error> {
        sqlx::query_as::<_, JobApplication>(
            "UPDATE job_applications SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
    }

    // --- Contact ---

    async fn recent_submission_count(
        &self,
        email: &str,
        ip: Option<&str>,
        since: DateTime<Utc>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM contact_submissions \
             WHERE created_at > $3 \
             AND (email = $1 OR ($2::text IS NOT NULL AND ip_address = $2))",
        )
        .bind(email)
        .bind(ip)
        .bind(since)
        .fetch_one(&self.pool)
        .await
    }

    async fn create_submission(
        &self,
        data: NewSubmission,
    ) -> Result<ContactSubmission, sqlx::Error> {
        sqlx::query_as::<_, ContactSubmission>(
            r#"
            INSERT INTO contact_submissions (id, name, email, phone, subject, message, status,
                                             ip_address, user_agent, referrer, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, 'new', $7, $8, $9, NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.name)
        .bind(data.email)
        .bind(data.phone)
        .bind(data.subject)
        .bind(data.message)
        .bind(data.ip_address)
        .bind(data.user_agent)
        .bind(data.referrer)
        .fetch_one(&self.pool)
        .await
    }

    async fn list_submissions(
        &self,
        status: Option<String>,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<ContactSubmission>, i64), sqlx::Error> {
        fn push_filters(builder: &mut QueryBuilder<'_, sqlx::Postgres>, status: &Option<String>) {
            if let Some(status) = status {
                builder.push(" WHERE status = ");
                builder.push_bind(status.clone());
            }
        }

        let mut count_builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM contact_submissions");
        push_filters(&mut count_builder, &status);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("SELECT * FROM contact_submissions");
        push_filters(&mut builder, &status);
        builder.push(" ORDER BY created_at DESC");
        let (limit, offset) = page_window(page, limit);
        builder.push(" LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let submissions = builder
            .build_query_as::<ContactSubmission>()
            .fetch_all(&self.pool)
            .await?;
        Ok((submissions, total))
    }

    async fn respond_to_submission(
        &self,
        id: Uuid,
        status: &str,
        response: Option<String>,
    ) -> Result<Option<ContactSubmission>, sqlx::Error> {
        sqlx::query_as::<_, ContactSubmission>(
            r#"
            UPDATE contact_submissions SET
                status = $2,
                response_message = COALESCE($3, response_message),
                responded_at = CASE WHEN $3::text IS NOT NULL THEN NOW() ELSE responded_at END
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(response)
        .fetch_optional(&self.pool)
        .await
    }

    async fn contact_emails(&self) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT DISTINCT email FROM contact_submissions")
            .fetch_all(&self.pool)
            .await
    }

    // --- Clients & partners ---

    async fn list_clients(&self) -> Result<Vec<Client>, sqlx::Error> {
        sqlx::query_as::<_, Client>("SELECT * FROM clients ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
    }

    async fn get_client(&self, id: Uuid) -> Result<Option<Client>, sqlx::Error> {
        sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn create_client(&self, data: NewClient) -> Result<Client, sqlx::Error> {
        sqlx::query_as::<_, Client>(
            "INSERT INTO clients (id, name, logo, brief, url, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, NOW(), NOW()) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.name)
        .bind(data.logo)
        .bind(data.brief)
        .bind(data.url)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_client(
        &self,
        id: Uuid,
        changes: ClientChanges,
    ) -> Result<Option<Client>, sqlx::Error> {
        sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients SET
                name = COALESCE($2, name),
                logo = COALESCE($3, logo),
                brief = COALESCE($4, brief),
                url = COALESCE($5, url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.logo)
        .bind(changes.brief)
        .bind(changes.url)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_client(&self, id: Uuid) -> Result<Option<Client>, sqlx::Error> {
        sqlx::query_as::<_, Client>("DELETE FROM clients WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn list_partners(&self) -> Result<Vec<Partner>, sqlx::Error> {
        sqlx::query_as::<_, Partner>("SELECT * FROM partners ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
    }

    async fn get_partner(&self, id: Uuid) -> Result<Option<Partner>, sqlx::Error> {
        sqlx::query_as::<_, Partner>("SELECT * FROM partners WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn create_partner(&self, data: NewPartner) -> Result<Partner, sqlx::Error> {
        sqlx::query_as::<_, Partner>(
            "INSERT INTO partners (id, name, slug, logo, brief, url, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW()) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.name)
        .bind(data.slug)
        .bind(data.logo)
        .bind(data.brief)
        .bind(data.url)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_partner(
        &self,
        id: Uuid,
        changes: PartnerChanges,
    ) -> Result<Option<Partner>, sqlx::Error> {
        sqlx::query_as::<_, Partner>(
            r#"
            UPDATE partners SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                logo = COALESCE($4, logo),
                brief = COALESCE($5, brief),
                url = COALESCE($6, url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.slug)
        .bind(changes.logo)
        .bind(changes.brief)
        .bind(changes.url)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_partner(&self, id: Uuid) -> Result<Option<Partner>, sqlx::Error> {
        sqlx::query_as::<_, Partner>("DELETE FROM partners WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    // --- About ---

    async fn get_about(&self, language: &str) -> Result<Option<About>, sqlx::Error> {
        sqlx::query_as::<_, About>(
            "SELECT * FROM about_pages WHERE language = $1 AND is_active = TRUE",
        )
        .bind(language)
        .fetch_optional(&self.pool)
        .await
    }

    async fn upsert_about(
        &self,
        language: &str,
        doc: AboutDocument,
    ) -> Result<About, sqlx::Error> {
        sqlx::query_as::<_, About>(
            r#"
            INSERT INTO about_pages (id, language, title, image, content, features, is_active,
                                     created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, '[]'::jsonb), TRUE, NOW(), NOW())
            ON CONFLICT (language) DO UPDATE SET
                title = EXCLUDED.title,
                image = COALESCE(EXCLUDED.image, about_pages.image),
                content = COALESCE(EXCLUDED.content, about_pages.content),
                features = COALESCE($6, about_pages.features),
                is_active = TRUE,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(language)
        .bind(doc.title)
        .bind(doc.image)
        .bind(doc.content)
        .bind(doc.features)
        .fetch_one(&self.pool)
        .await
    }

    // --- Profiles ---

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT id, email, role FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn create_user(&self, user: User) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "INSERT INTO profiles (id, email, role) VALUES ($1, $2, $3) \
             RETURNING id, email, role",
        )
        .bind(user.id)
        .bind(user.email)
        .bind(user.role)
        .fetch_one(&self.pool)
        .await
    }

    // --- Dashboard ---

    async fn get_stats(&self) -> Result<DashboardStats, sqlx::Error> {
        let total_pages =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pages WHERE is_active = TRUE")
                .fetch_one(&self.pool)
                .await?;
        let total_services =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM services WHERE is_active = TRUE")
                .fetch_one(&self.pool)
                .await?;
        let total_blogs = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM blogs")
            .fetch_one(&self.pool)
            .await?;
        let total_careers = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM careers")
            .fetch_one(&self.pool)
            .await?;
        let new_submissions = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM contact_submissions WHERE status = 'new'",
        )
        .fetch_one(&self.pool)
        .await?;
        let submitted_applications = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM job_applications WHERE status = 'submitted'",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(DashboardStats {
            total_pages,
            total_services,
            total_blogs,
            total_careers,
            new_submissions,
            submitted_applications,
        })
    }
}
