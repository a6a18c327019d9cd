// tests/support/mod.rs
//
// In-memory fakes for the repository traits plus dummy ports. The store
// mirrors the foreign-key policies the migrations declare (category→post
// cascade, post→comment/reaction cascade, user→post/comment set-null) so
// service tests can observe them without a database.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use tanzaku_core::application::dto::{AuthTokenDto, AuthenticatedUser, TokenSubject};
use tanzaku_core::application::error::{ApplicationError, ApplicationResult};
use tanzaku_core::application::ports::security::{PasswordHasher, TokenManager};
use tanzaku_core::application::ports::time::Clock;
use tanzaku_core::domain::category::{
    Category, CategoryId, CategoryRepository, CategoryTitle, CategoryUpdate, NewCategory,
};
use tanzaku_core::domain::comment::{
    Comment, CommentBody, CommentId, CommentRepository, CommentUpdate, NewComment,
};
use tanzaku_core::domain::errors::{DomainError, DomainResult};
use tanzaku_core::domain::post::{
    NewPost, Post, PostBody, PostId, PostReadRepository, PostTitle, PostUpdate,
    PostWriteRepository,
};
use tanzaku_core::domain::reaction::{Reaction, ReactionKind, ReactionRepository, ReactionTally};
use tanzaku_core::domain::slugs::{Slug, SlugIndex};
use tanzaku_core::domain::user::{
    NewUser, PasswordHash, Role, User, UserId, UserRepository, Username,
};

#[derive(Default)]
struct StoreState {
    users: HashMap<i64, User>,
    categories: HashMap<i64, Category>,
    posts: HashMap<i64, Post>,
    comments: HashMap<i64, Comment>,
    reactions: HashMap<(i64, i64), Reaction>,
    next_id: i64,
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc_id(state: &mut StoreState) -> i64 {
        state.next_id += 1;
        state.next_id
    }

    pub fn category_repo(&self) -> CategoryStore {
        CategoryStore(self.clone())
    }

    pub fn post_repo(&self) -> PostStore {
        PostStore(self.clone())
    }

    pub fn comment_repo(&self) -> CommentStore {
        CommentStore(self.clone())
    }

    pub fn reaction_repo(&self) -> ReactionStore {
        ReactionStore(self.clone())
    }

    pub fn user_repo(&self) -> UserStore {
        UserStore(self.clone())
    }

    // ---- seeding helpers ----

    pub fn seed_user(&self, username: &str, role: Role) -> User {
        let mut state = self.state.lock().unwrap();
        let id = Self::alloc_id(&mut state);
        let user = User {
            id: UserId::new(id).unwrap(),
            username: Username::new(username).unwrap(),
            password_hash: PasswordHash::new("hashed:secret").unwrap(),
            role,
            is_active: true,
            created_at: Utc::now(),
        };
        state.users.insert(id, user.clone());
        user
    }

    pub fn deactivate_user(&self, id: UserId) {
        let mut state = self.state.lock().unwrap();
        if let Some(user) = state.users.get_mut(&i64::from(id)) {
            user.is_active = false;
        }
    }

    pub fn seed_category(&self, title: &str, slug: &str) -> Category {
        let mut state = self.state.lock().unwrap();
        let id = Self::alloc_id(&mut state);
        let category = Category {
            id: CategoryId::new(id).unwrap(),
            title: CategoryTitle::new(title).unwrap(),
            slug: Slug::new(slug).unwrap(),
        };
        state.categories.insert(id, category.clone());
        category
    }

    pub fn seed_post(
        &self,
        title: &str,
        slug: &str,
        category: &Category,
        author: Option<UserId>,
    ) -> Post {
        let mut state = self.state.lock().unwrap();
        let id = Self::alloc_id(&mut state);
        let now = Utc::now();
        let post = Post {
            id: PostId::new(id).unwrap(),
            title: PostTitle::new(title).unwrap(),
            body: PostBody::new("some text").unwrap(),
            slug: Slug::new(slug).unwrap(),
            likes: 0,
            dislikes: 0,
            author_id: author,
            category_id: category.id,
            created_at: now,
            updated_at: now,
        };
        state.posts.insert(id, post.clone());
        post
    }

    pub fn seed_comment(
        &self,
        post: &Post,
        author: Option<UserId>,
        parent: Option<CommentId>,
        text: &str,
    ) -> Comment {
        let mut state = self.state.lock().unwrap();
        let id = Self::alloc_id(&mut state);
        let now = Utc::now();
        let comment = Comment {
            id: CommentId::new(id).unwrap(),
            post_id: post.id,
            author_id: author,
            parent_id: parent,
            body: CommentBody::new(text).unwrap(),
            created_at: now,
            updated_at: now,
        };
        state.comments.insert(id, comment.clone());
        comment
    }

    pub fn seed_reaction(&self, post: &Post, user: UserId, kind: ReactionKind) {
        let mut state = self.state.lock().unwrap();
        let key = (i64::from(post.id), i64::from(user));
        state.reactions.insert(
            key,
            Reaction {
                post_id: post.id,
                user_id: user,
                kind,
                created_at: Utc::now(),
            },
        );
    }

    // ---- inspection helpers ----

    pub fn post_rows(&self) -> usize {
        self.state.lock().unwrap().posts.len()
    }

    pub fn comment_rows(&self) -> usize {
        self.state.lock().unwrap().comments.len()
    }

    pub fn reaction_rows(&self) -> usize {
        self.state.lock().unwrap().reactions.len()
    }

    pub fn find_post(&self, id: PostId) -> Option<Post> {
        self.state.lock().unwrap().posts.get(&i64::from(id)).cloned()
    }

    pub fn find_comment(&self, id: CommentId) -> Option<Comment> {
        self.state
            .lock()
            .unwrap()
            .comments
            .get(&i64::from(id))
            .cloned()
    }

    pub fn reaction_for(&self, post: &Post, user: UserId) -> Option<Reaction> {
        self.state
            .lock()
            .unwrap()
            .reactions
            .get(&(i64::from(post.id), i64::from(user)))
            .cloned()
    }

    /// Apply the user-deletion foreign-key policies: posts and comments keep
    /// their rows with a nulled author, reactions disappear with the user.
    pub fn delete_user(&self, id: UserId) {
        let mut state = self.state.lock().unwrap();
        let raw = i64::from(id);
        state.users.remove(&raw);
        for post in state.posts.values_mut() {
            if post.author_id == Some(id) {
                post.author_id = None;
            }
        }
        for comment in state.comments.values_mut() {
            if comment.author_id == Some(id) {
                comment.author_id = None;
            }
        }
        state.reactions.retain(|(_, user_id), _| *user_id != raw);
    }
}

fn cascade_post_delete(state: &mut StoreState, post_id: i64) {
    state.comments.retain(|_, c| i64::from(c.post_id) != post_id);
    state.reactions.retain(|(pid, _), _| *pid != post_id);
}

// ---- category fake ----

#[derive(Clone)]
pub struct CategoryStore(InMemoryStore);

#[async_trait]
impl CategoryRepository for CategoryStore {
    async fn insert(&self, category: NewCategory) -> DomainResult<Category> {
        let mut state = self.0.state.lock().unwrap();
        if state
            .categories
            .values()
            .any(|c| c.slug == category.slug)
        {
            return Err(DomainError::Conflict("slug already exists".into()));
        }
        let id = InMemoryStore::alloc_id(&mut state);
        let category = Category {
            id: CategoryId::new(id).unwrap(),
            title: category.title,
            slug: category.slug,
        };
        state.categories.insert(id, category.clone());
        Ok(category)
    }

    async fn update(&self, update: CategoryUpdate) -> DomainResult<Category> {
        let mut state = self.0.state.lock().unwrap();
        let raw = i64::from(update.id);
        if state
            .categories
            .values()
            .any(|c| c.slug == update.slug && c.id != update.id)
        {
            return Err(DomainError::Conflict("slug already exists".into()));
        }
        let category = state
            .categories
            .get_mut(&raw)
            .ok_or_else(|| DomainError::NotFound("category not found".into()))?;
        category.title = update.title;
        category.slug = update.slug;
        Ok(category.clone())
    }

    async fn delete(&self, id: CategoryId) -> DomainResult<()> {
        let mut state = self.0.state.lock().unwrap();
        let raw = i64::from(id);
        if state.categories.remove(&raw).is_none() {
            return Err(DomainError::NotFound("category not found".into()));
        }
        let post_ids: Vec<i64> = state
            .posts
            .values()
            .filter(|p| p.category_id == id)
            .map(|p| i64::from(p.id))
            .collect();
        for post_id in post_ids {
            state.posts.remove(&post_id);
            cascade_post_delete(&mut state, post_id);
        }
        Ok(())
    }

    async fn find_by_id(&self, id: CategoryId) -> DomainResult<Option<Category>> {
        let state = self.0.state.lock().unwrap();
        Ok(state.categories.get(&i64::from(id)).cloned())
    }

    async fn find_by_slug(&self, slug: &Slug) -> DomainResult<Option<Category>> {
        let state = self.0.state.lock().unwrap();
        Ok(state.categories.values().find(|c| &c.slug == slug).cloned())
    }

    async fn list(&self) -> DomainResult<Vec<Category>> {
        let state = self.0.state.lock().unwrap();
        let mut categories: Vec<_> = state.categories.values().cloned().collect();
        categories.sort_by_key(|c| i64::from(c.id));
        Ok(categories)
    }
}

#[async_trait]
impl SlugIndex for CategoryStore {
    async fn slug_exists(&self, slug: &str) -> DomainResult<bool> {
        let state = self.0.state.lock().unwrap();
        Ok(state.categories.values().any(|c| c.slug.as_str() == slug))
    }
}

// ---- post fake ----

#[derive(Clone)]
pub struct PostStore(InMemoryStore);

#[async_trait]
impl PostWriteRepository for PostStore {
    async fn insert(&self, post: NewPost) -> DomainResult<Post> {
        let mut state = self.0.state.lock().unwrap();
        if state.posts.values().any(|p| p.slug == post.slug) {
            return Err(DomainError::Conflict("slug already exists".into()));
        }
        let id = InMemoryStore::alloc_id(&mut state);
        let post = Post {
            id: PostId::new(id).unwrap(),
            title: post.title,
            body: post.body,
            slug: post.slug,
            likes: 0,
            dislikes: 0,
            author_id: post.author_id,
            category_id: post.category_id,
            created_at: post.created_at,
            updated_at: post.updated_at,
        };
        state.posts.insert(id, post.clone());
        Ok(post)
    }

    async fn update(&self, update: PostUpdate) -> DomainResult<Post> {
        let mut state = self.0.state.lock().unwrap();
        let post = state
            .posts
            .get_mut(&i64::from(update.id))
            .ok_or_else(|| DomainError::NotFound("post not found".into()))?;
        post.title = update.title;
        post.body = update.body;
        post.category_id = update.category_id;
        post.updated_at = update.updated_at;
        Ok(post.clone())
    }

    async fn delete(&self, id: PostId) -> DomainResult<()> {
        let mut state = self.0.state.lock().unwrap();
        let raw = i64::from(id);
        if state.posts.remove(&raw).is_none() {
            return Err(DomainError::NotFound("post not found".into()));
        }
        cascade_post_delete(&mut state, raw);
        Ok(())
    }
}

#[async_trait]
impl PostReadRepository for PostStore {
    async fn find_by_id(&self, id: PostId) -> DomainResult<Option<Post>> {
        let state = self.0.state.lock().unwrap();
        Ok(state.posts.get(&i64::from(id)).cloned())
    }

    async fn find_by_slug(&self, slug: &Slug) -> DomainResult<Option<Post>> {
        let state = self.0.state.lock().unwrap();
        Ok(state.posts.values().find(|p| &p.slug == slug).cloned())
    }

    async fn list_page(&self, page: u32, page_size: u32) -> DomainResult<(Vec<Post>, u64)> {
        let state = self.0.state.lock().unwrap();
        let mut posts: Vec<_> = state.posts.values().cloned().collect();
        posts.sort_by_key(|p| std::cmp::Reverse(i64::from(p.id)));
        let total = posts.len() as u64;
        let start = ((page.max(1) - 1) * page_size) as usize;
        let items = posts
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .collect();
        Ok((items, total))
    }
}

#[async_trait]
impl SlugIndex for PostStore {
    async fn slug_exists(&self, slug: &str) -> DomainResult<bool> {
        let state = self.0.state.lock().unwrap();
        Ok(state.posts.values().any(|p| p.slug.as_str() == slug))
    }
}

// ---- comment fake ----

#[derive(Clone)]
pub struct CommentStore(InMemoryStore);

#[async_trait]
impl CommentRepository for CommentStore {
    async fn insert(&self, comment: NewComment) -> DomainResult<Comment> {
        let mut state = self.0.state.lock().unwrap();
        let id = InMemoryStore::alloc_id(&mut state);
        let comment = Comment {
            id: CommentId::new(id).unwrap(),
            post_id: comment.post_id,
            author_id: comment.author_id,
            parent_id: comment.parent_id,
            body: comment.body,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        };
        state.comments.insert(id, comment.clone());
        Ok(comment)
    }

    async fn update(&self, update: CommentUpdate) -> DomainResult<Comment> {
        let mut state = self.0.state.lock().unwrap();
        let comment = state
            .comments
            .get_mut(&i64::from(update.id))
            .ok_or_else(|| DomainError::NotFound("comment not found".into()))?;
        comment.body = update.body;
        comment.updated_at = update.updated_at;
        Ok(comment.clone())
    }

    async fn delete(&self, id: CommentId) -> DomainResult<()> {
        let mut state = self.0.state.lock().unwrap();
        if state.comments.remove(&i64::from(id)).is_none() {
            return Err(DomainError::NotFound("comment not found".into()));
        }
        state.comments.retain(|_, c| c.parent_id != Some(id));
        Ok(())
    }

    async fn find_by_id(&self, id: CommentId) -> DomainResult<Option<Comment>> {
        let state = self.0.state.lock().unwrap();
        Ok(state.comments.get(&i64::from(id)).cloned())
    }

    async fn list_by_post(&self, post_id: PostId) -> DomainResult<Vec<Comment>> {
        let state = self.0.state.lock().unwrap();
        let mut comments: Vec<_> = state
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| (c.created_at, i64::from(c.id)));
        Ok(comments)
    }
}

// ---- reaction fake ----

#[derive(Clone)]
pub struct ReactionStore(InMemoryStore);

#[async_trait]
impl ReactionRepository for ReactionStore {
    async fn find_by_post_and_user(
        &self,
        post_id: PostId,
        user_id: UserId,
    ) -> DomainResult<Option<Reaction>> {
        let state = self.0.state.lock().unwrap();
        Ok(state
            .reactions
            .get(&(i64::from(post_id), i64::from(user_id)))
            .cloned())
    }

    async fn upsert(
        &self,
        post_id: PostId,
        user_id: UserId,
        kind: ReactionKind,
        now: DateTime<Utc>,
    ) -> DomainResult<Reaction> {
        let mut state = self.0.state.lock().unwrap();
        let entry = state
            .reactions
            .entry((i64::from(post_id), i64::from(user_id)))
            .and_modify(|r| r.kind = kind)
            .or_insert(Reaction {
                post_id,
                user_id,
                kind,
                created_at: now,
            });
        Ok(entry.clone())
    }

    async fn remove(&self, post_id: PostId, user_id: UserId) -> DomainResult<()> {
        let mut state = self.0.state.lock().unwrap();
        state
            .reactions
            .remove(&(i64::from(post_id), i64::from(user_id)));
        Ok(())
    }

    async fn tally_for_post(&self, post_id: PostId) -> DomainResult<ReactionTally> {
        let state = self.0.state.lock().unwrap();
        let mut tally = ReactionTally::default();
        for reaction in state.reactions.values() {
            if reaction.post_id == post_id {
                match reaction.kind {
                    ReactionKind::Like => tally.likes += 1,
                    ReactionKind::Dislike => tally.dislikes += 1,
                }
            }
        }
        Ok(tally)
    }
}

// ---- user fake ----

#[derive(Clone)]
pub struct UserStore(InMemoryStore);

#[async_trait]
impl UserRepository for UserStore {
    async fn count(&self) -> DomainResult<u64> {
        let state = self.0.state.lock().unwrap();
        Ok(state.users.len() as u64)
    }

    async fn insert(&self, new_user: NewUser) -> DomainResult<User> {
        let mut state = self.0.state.lock().unwrap();
        if state
            .users
            .values()
            .any(|u| u.username == new_user.username)
        {
            return Err(DomainError::Conflict("username already exists".into()));
        }
        let id = InMemoryStore::alloc_id(&mut state);
        let user = User {
            id: UserId::new(id).unwrap(),
            username: new_user.username,
            password_hash: new_user.password_hash,
            role: new_user.role,
            is_active: new_user.is_active,
            created_at: new_user.created_at,
        };
        state.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &Username) -> DomainResult<Option<User>> {
        let state = self.0.state.lock().unwrap();
        Ok(state
            .users
            .values()
            .find(|u| &u.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> DomainResult<Option<User>> {
        let state = self.0.state.lock().unwrap();
        Ok(state.users.get(&i64::from(id)).cloned())
    }
}

// ---- port doubles ----

pub struct DummyPasswordHasher;

#[async_trait]
impl PasswordHasher for DummyPasswordHasher {
    async fn hash(&self, password: &str) -> ApplicationResult<String> {
        Ok(format!("hashed:{password}"))
    }

    async fn verify(&self, password: &str, expected_hash: &str) -> ApplicationResult<()> {
        if expected_hash == format!("hashed:{password}") {
            Ok(())
        } else {
            Err(ApplicationError::unauthorized("invalid credentials"))
        }
    }
}

pub struct FakeTokenManager;

#[async_trait]
impl TokenManager for FakeTokenManager {
    async fn issue(&self, subject: TokenSubject) -> ApplicationResult<AuthTokenDto> {
        let now = Utc::now();
        Ok(AuthTokenDto {
            access_token: format!("access-{}", subject.username),
            refresh_token: format!("refresh-{}", subject.username),
            token_type: "Bearer".into(),
            issued_at: now,
            expires_at: now + chrono::Duration::hours(1),
            expires_in: 3600,
        })
    }

    async fn authenticate(&self, _token: &str) -> ApplicationResult<AuthenticatedUser> {
        Err(ApplicationError::unauthorized("not supported in tests"))
    }

    async fn refresh(&self, _refresh_token: &str) -> ApplicationResult<AuthTokenDto> {
        Err(ApplicationError::unauthorized("not supported in tests"))
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Default for FixedClock {
    fn default() -> Self {
        Self(Utc::now())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn authed(user: &User) -> AuthenticatedUser {
    let now = Utc::now();
    AuthenticatedUser {
        id: user.id,
        username: user.username.to_string(),
        role: user.role,
        capabilities: user.role.default_capabilities(),
        issued_at: now,
        expires_at: now + chrono::Duration::hours(1),
    }
}
