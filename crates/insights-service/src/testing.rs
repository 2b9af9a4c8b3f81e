//! Fixtures and in-memory doubles for service tests.

use crate::ai::SummaryGenerator;
use crate::source::{PageSource, SourceComment, SourceEmployee, SourceOrganization, SourcePost};
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use insights_core::{
    Comment, CommentId, Employee, EmployeeId, InsightsError, InsightsResult, Page, PageId,
    PageRequest, Paginated, Post, PostId,
};
use insights_repository::{
    CommentRepository, EmployeeRepository, NewComment, NewEmployee, NewPage, NewPost, PageFilter,
    PageRepository, PostFilter, PostRepository, PostStats,
};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub(crate) fn sample_page(slug: &str) -> Page {
    Page {
        id: PageId(1),
        page_id: slug.to_string(),
        linkedin_id: Some("1234".to_string()),
        name: "Acme".to_string(),
        url: Some(format!("https://www.linkedin.com/company/{slug}")),
        profile_picture_url: None,
        profile_picture_s3_url: None,
        description: None,
        tagline: None,
        website: None,
        industry: None,
        company_size: None,
        headquarters: None,
        founded_year: None,
        company_type: None,
        follower_count: 0,
        employee_count: 0,
        specialties: None,
        locations: None,
        extra_data: None,
        created_at: Utc::now(),
        updated_at: None,
        last_scraped_at: None,
    }
}

pub(crate) fn sample_post(id: i64, post_id: &str) -> Post {
    Post {
        id: PostId(id),
        post_id: post_id.to_string(),
        page_id: PageId(1),
        text: None,
        content_type: None,
        media_url: None,
        media_s3_url: None,
        media_type: None,
        like_count: 0,
        comment_count: 0,
        share_count: 0,
        view_count: 0,
        posted_at: Utc.timestamp_opt(1_700_000_000 + id * 60, 0).single(),
        author_name: None,
        author_title: None,
        hashtags: None,
        mentions: None,
        extra_data: None,
        created_at: Utc::now(),
        updated_at: None,
    }
}

pub(crate) fn sample_comment(id: i64, comment_id: &str, post: PostId) -> Comment {
    Comment {
        id: CommentId(id),
        comment_id: comment_id.to_string(),
        post_id: post,
        parent_comment_id: None,
        text: None,
        author_id: None,
        author_name: None,
        author_title: None,
        author_profile_url: None,
        author_profile_picture: None,
        like_count: 0,
        reply_count: 0,
        commented_at: Some(Utc::now() - Duration::minutes(id)),
        created_at: Utc::now(),
        extra_data: None,
    }
}

pub(crate) fn sample_employee(id: i64, linkedin_id: &str) -> Employee {
    Employee {
        id: EmployeeId(id),
        linkedin_id: linkedin_id.to_string(),
        page_id: PageId(1),
        first_name: None,
        last_name: None,
        full_name: None,
        headline: None,
        profile_url: None,
        profile_picture_url: None,
        profile_picture_s3_url: None,
        current_title: None,
        current_company: None,
        location: None,
        country: None,
        industry: None,
        connections_count: None,
        is_following: false,
        is_follower: false,
        is_employee: true,
        experience_summary: None,
        education_summary: None,
        skills: None,
        extra_data: None,
        created_at: Utc::now(),
        updated_at: None,
    }
}

fn page_slice<T: Clone>(items: &[T], page: PageRequest) -> Paginated<T> {
    let start = usize::try_from(page.offset()).unwrap_or(usize::MAX).min(items.len());
    let end = (start + page.page_size as usize).min(items.len());
    Paginated::from_request(items[start..end].to_vec(), page, items.len() as u64)
}

fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(&needle.to_lowercase()))
}

// ============================================================================
// Repositories
// ============================================================================

#[derive(Default)]
pub(crate) struct MemoryPageRepository {
    pages: Mutex<Vec<Page>>,
    pub(crate) upserts: AtomicUsize,
}

impl MemoryPageRepository {
    pub(crate) fn with_pages(pages: Vec<Page>) -> Self {
        Self {
            pages: Mutex::new(pages),
            upserts: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl PageRepository for MemoryPageRepository {
    async fn find_by_page_id(&self, page_id: &str) -> InsightsResult<Option<Page>> {
        Ok(self.pages.lock().unwrap().iter().find(|p| p.page_id == page_id).cloned())
    }

    async fn find_by_page_ids(&self, page_ids: &[String]) -> InsightsResult<Vec<Page>> {
        Ok(self
            .pages
            .lock()
            .unwrap()
            .iter()
            .filter(|p| page_ids.contains(&p.page_id))
            .cloned()
            .collect())
    }

    async fn find_all(&self, filter: &PageFilter, page: PageRequest) -> InsightsResult<Paginated<Page>> {
        let mut matching: Vec<Page> = self
            .pages
            .lock()
            .unwrap()
            .iter()
            .filter(|p| filter.name.as_deref().map_or(true, |n| contains_ci(Some(p.name.as_str()), n)))
            .filter(|p| filter.industry.as_deref().map_or(true, |i| contains_ci(p.industry.as_deref(), i)))
            .filter(|p| filter.min_followers.map_or(true, |m| p.follower_count >= m))
            .filter(|p| filter.max_followers.map_or(true, |m| p.follower_count <= m))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.follower_count.cmp(&a.follower_count));
        Ok(page_slice(&matching, page))
    }

    async fn upsert(&self, new: &NewPage) -> InsightsResult<Page> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        let mut pages = self.pages.lock().unwrap();
        let next_id = pages.len() as i64 + 1;
        let index = match pages.iter().position(|p| p.page_id == new.page_id) {
            Some(index) => index,
            None => {
                pages.push(Page {
                    id: PageId(next_id),
                    ..sample_page(&new.page_id)
                });
                pages.len() - 1
            }
        };
        let page = &mut pages[index];
        page.name = new.name.clone();
        page.linkedin_id = new.linkedin_id.clone().or(page.linkedin_id.take());
        page.url = new.url.clone().or(page.url.take());
        page.industry = new.industry.clone().or(page.industry.take());
        page.description = new.description.clone().or(page.description.take());
        page.headquarters = new.headquarters.clone().or(page.headquarters.take());
        page.company_size = new.company_size.clone().or(page.company_size.take());
        page.follower_count = new.follower_count.unwrap_or(page.follower_count);
        page.employee_count = new.employee_count.unwrap_or(page.employee_count);
        page.last_scraped_at = Some(Utc::now());
        Ok(page.clone())
    }

    async fn delete(&self, page_id: &str) -> InsightsResult<bool> {
        let mut pages = self.pages.lock().unwrap();
        let before = pages.len();
        pages.retain(|p| p.page_id != page_id);
        Ok(pages.len() < before)
    }
}

#[derive(Default)]
pub(crate) struct MemoryPostRepository {
    pub(crate) posts: Mutex<Vec<Post>>,
}

impl MemoryPostRepository {
    pub(crate) fn with_posts(posts: Vec<Post>) -> Self {
        Self { posts: Mutex::new(posts) }
    }

    fn sorted(&self, filter: impl Fn(&Post) -> bool) -> Vec<Post> {
        let mut posts: Vec<Post> = self.posts.lock().unwrap().iter().filter(|p| filter(p)).cloned().collect();
        posts.sort_by(|a, b| b.posted_at.cmp(&a.posted_at).then(b.id.cmp(&a.id)));
        posts
    }
}

#[async_trait]
impl PostRepository for MemoryPostRepository {
    async fn find_by_post_id(&self, post_id: &str) -> InsightsResult<Option<Post>> {
        Ok(self.posts.lock().unwrap().iter().find(|p| p.post_id == post_id).cloned())
    }

    async fn find_all(&self, filter: &PostFilter, page: PageRequest) -> InsightsResult<Paginated<Post>> {
        let posts = self.sorted(|p| {
            filter.page.map_or(true, |id| p.page_id == id)
                && filter.content_type.as_deref().map_or(true, |c| p.content_type.as_deref() == Some(c))
                && filter.min_likes.map_or(true, |m| p.like_count >= m)
        });
        Ok(page_slice(&posts, page))
    }

    async fn find_by_page(&self, page_id: PageId, page: PageRequest) -> InsightsResult<Paginated<Post>> {
        Ok(page_slice(&self.sorted(|p| p.page_id == page_id), page))
    }

    async fn find_recent(&self, page_id: PageId, limit: u32) -> InsightsResult<Vec<Post>> {
        Ok(self.sorted(|p| p.page_id == page_id).into_iter().take(limit as usize).collect())
    }

    async fn count_by_page(&self, page_id: PageId) -> InsightsResult<i64> {
        Ok(self.sorted(|p| p.page_id == page_id).len() as i64)
    }

    #[allow(clippy::cast_precision_loss)]
    async fn stats_by_page(&self, page_id: PageId) -> InsightsResult<PostStats> {
        let posts = self.sorted(|p| p.page_id == page_id);
        if posts.is_empty() {
            return Ok(PostStats::default());
        }
        let n = posts.len() as f64;
        let likes: i64 = posts.iter().map(|p| p.like_count).sum();
        Ok(PostStats {
            total_posts: posts.len() as i64,
            avg_likes: likes as f64 / n,
            avg_comments: posts.iter().map(|p| p.comment_count).sum::<i64>() as f64 / n,
            avg_shares: posts.iter().map(|p| p.share_count).sum::<i64>() as f64 / n,
            total_likes: likes,
        })
    }

    async fn upsert(&self, new: &NewPost) -> InsightsResult<Post> {
        let mut posts = self.posts.lock().unwrap();
        let next_id = posts.len() as i64 + 1;
        let index = match posts.iter().position(|p| p.post_id == new.post_id) {
            Some(index) => index,
            None => {
                posts.push(sample_post(next_id, &new.post_id));
                posts.len() - 1
            }
        };
        let post = &mut posts[index];
        post.page_id = new.page_id;
        post.text = new.text.clone().or(post.text.take());
        post.content_type = new.content_type.clone().or(post.content_type.take());
        post.like_count = new.like_count;
        post.comment_count = new.comment_count;
        post.share_count = new.share_count;
        post.posted_at = new.posted_at.or(post.posted_at);
        post.hashtags = new.hashtags.clone().or(post.hashtags.take());
        Ok(post.clone())
    }
}

#[derive(Default)]
pub(crate) struct MemoryCommentRepository {
    pub(crate) comments: Mutex<Vec<Comment>>,
}

impl MemoryCommentRepository {
    pub(crate) fn with_comments(comments: Vec<Comment>) -> Self {
        Self { comments: Mutex::new(comments) }
    }

    fn sorted(&self, post_id: PostId) -> Vec<Comment> {
        let mut comments: Vec<Comment> = self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.commented_at.cmp(&a.commented_at).then(b.id.cmp(&a.id)));
        comments
    }
}

#[async_trait]
impl CommentRepository for MemoryCommentRepository {
    async fn find_by_post(&self, post_id: PostId, page: PageRequest) -> InsightsResult<Paginated<Comment>> {
        Ok(page_slice(&self.sorted(post_id), page))
    }

    async fn find_recent_by_post(&self, post_id: PostId, limit: u32) -> InsightsResult<Vec<Comment>> {
        Ok(self.sorted(post_id).into_iter().take(limit as usize).collect())
    }

    async fn find_by_comment_id(&self, comment_id: &str) -> InsightsResult<Option<Comment>> {
        Ok(self.comments.lock().unwrap().iter().find(|c| c.comment_id == comment_id).cloned())
    }

    async fn upsert(&self, new: &NewComment) -> InsightsResult<Comment> {
        let mut comments = self.comments.lock().unwrap();
        let next_id = comments.len() as i64 + 1;
        let index = match comments.iter().position(|c| c.comment_id == new.comment_id) {
            Some(index) => index,
            None => {
                comments.push(sample_comment(next_id, &new.comment_id, new.post_id));
                comments.len() - 1
            }
        };
        let comment = &mut comments[index];
        comment.post_id = new.post_id;
        comment.parent_comment_id = new.parent_comment_id.or(comment.parent_comment_id);
        comment.text = new.text.clone().or(comment.text.take());
        comment.author_id = new.author_id.clone().or(comment.author_id.take());
        comment.like_count = new.like_count;
        comment.commented_at = new.commented_at.or(comment.commented_at);
        Ok(comment.clone())
    }
}

#[derive(Default)]
pub(crate) struct MemoryEmployeeRepository {
    pub(crate) employees: Mutex<Vec<Employee>>,
}

impl MemoryEmployeeRepository {
    pub(crate) fn with_employees(employees: Vec<Employee>) -> Self {
        Self { employees: Mutex::new(employees) }
    }

    fn matching(&self, page_id: PageId, predicate: impl Fn(&Employee) -> bool) -> Vec<Employee> {
        self.employees
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.page_id == page_id && predicate(e))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl EmployeeRepository for MemoryEmployeeRepository {
    async fn find_by_page(&self, page_id: PageId, page: PageRequest) -> InsightsResult<Paginated<Employee>> {
        Ok(page_slice(&self.matching(page_id, |_| true), page))
    }

    async fn find_limited_by_page(&self, page_id: PageId, limit: u32) -> InsightsResult<Vec<Employee>> {
        Ok(self.matching(page_id, |_| true).into_iter().take(limit as usize).collect())
    }

    async fn find_followers(&self, page_id: PageId, page: PageRequest) -> InsightsResult<Vec<Employee>> {
        Ok(page_slice(&self.matching(page_id, |e| e.is_follower), page).items)
    }

    async fn find_following(&self, page_id: PageId, page: PageRequest) -> InsightsResult<Vec<Employee>> {
        Ok(page_slice(&self.matching(page_id, |e| e.is_following), page).items)
    }

    async fn count_by_page(&self, page_id: PageId) -> InsightsResult<i64> {
        Ok(self.matching(page_id, |_| true).len() as i64)
    }

    async fn count_followers(&self, page_id: PageId) -> InsightsResult<i64> {
        Ok(self.matching(page_id, |e| e.is_follower).len() as i64)
    }

    async fn count_following(&self, page_id: PageId) -> InsightsResult<i64> {
        Ok(self.matching(page_id, |e| e.is_following).len() as i64)
    }

    async fn upsert(&self, new: &NewEmployee) -> InsightsResult<Employee> {
        let mut employees = self.employees.lock().unwrap();
        let next_id = employees.len() as i64 + 1;
        let index = match employees.iter().position(|e| e.linkedin_id == new.linkedin_id) {
            Some(index) => index,
            None => {
                let mut fresh = sample_employee(next_id, &new.linkedin_id);
                fresh.is_employee = false;
                employees.push(fresh);
                employees.len() - 1
            }
        };
        let employee = &mut employees[index];
        employee.page_id = new.page_id;
        employee.first_name = new.first_name.clone().or(employee.first_name.take());
        employee.last_name = new.last_name.clone().or(employee.last_name.take());
        employee.full_name = new.full_name.clone().or(employee.full_name.take());
        employee.headline = new.headline.clone().or(employee.headline.take());
        employee.location = new.location.clone().or(employee.location.take());
        employee.is_employee |= new.is_employee;
        employee.is_follower |= new.is_follower;
        employee.is_following |= new.is_following;
        Ok(employee.clone())
    }
}

// ============================================================================
// Outbound doubles
// ============================================================================

/// Source with canned data for one organization.
#[derive(Default)]
pub(crate) struct FakeSource {
    pub(crate) organization: Option<SourceOrganization>,
    pub(crate) posts: Vec<SourcePost>,
    pub(crate) comments: HashMap<String, Vec<SourceComment>>,
    pub(crate) employees: Vec<SourceEmployee>,
    pub(crate) fail_lookup: bool,
    pub(crate) lookups: AtomicUsize,
}

#[async_trait]
impl PageSource for FakeSource {
    async fn fetch_organization(&self, vanity_name: &str) -> InsightsResult<Option<SourceOrganization>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookup {
            return Err(InsightsError::external("linkedin", "connection reset"));
        }
        Ok(self
            .organization
            .clone()
            .filter(|o| o.vanity_name == vanity_name))
    }

    async fn fetch_posts(&self, _org_id: &str, count: u32) -> Vec<SourcePost> {
        self.posts.iter().take(count as usize).cloned().collect()
    }

    async fn fetch_comments(&self, post_urn: &str, count: u32) -> Vec<SourceComment> {
        self.comments
            .get(post_urn)
            .map(|c| c.iter().take(count as usize).cloned().collect())
            .unwrap_or_default()
    }

    async fn fetch_employees(&self, _org_id: &str, count: u32) -> Vec<SourceEmployee> {
        self.employees.iter().take(count as usize).cloned().collect()
    }
}

/// Generator returning a fixed answer, or failing when `answer` is `None`.
pub(crate) struct FakeGenerator {
    pub(crate) configured: bool,
    pub(crate) answer: Option<JsonValue>,
    pub(crate) calls: AtomicUsize,
    pub(crate) prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub(crate) fn answering(answer: JsonValue) -> Self {
        Self {
            configured: true,
            answer: Some(answer),
            calls: AtomicUsize::new(0),
            prompts: Mutex::default(),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            configured: true,
            answer: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::default(),
        }
    }

    pub(crate) fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::failing()
        }
    }
}

#[async_trait]
impl SummaryGenerator for FakeGenerator {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn complete_json(&self, _system: &str, prompt: &str) -> InsightsResult<JsonValue> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer
            .clone()
            .ok_or_else(|| InsightsError::external("openai", "status 500"))
    }
}
