//! Comment Thread Engine
//!
//! Pure logic behind threaded comments. Two operations live here:
//!
//! - [`normalize`] decides where a new comment is attached. Replies to replies
//!   are collapsed onto the thread's root so the stored hierarchy is never
//!   deeper than one level.
//! - [`assemble_article`] and [`assemble_thread`] rebuild the nested view from
//!   flat records. Each reply is annotated with the comment it answers.
//!
//! Nothing in this module touches a store. Callers fetch the records and
//! pass them in. Assembly only ever reads the stored `parent_comment_id`; it
//! never walks pointer chains to find a root.

use std::collections::HashMap;

use uuid::Uuid;

use crate::shared::comment::{Comment, CommentView, ReplyNode, ThreadNode};
use crate::shared::error::SharedError;
use crate::shared::user::AuthorProfile;

/// Structural and display parents computed for a new comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParentLink {
    /// Root of the thread, `None` for a new root comment
    pub parent_comment_id: Option<Uuid>,
    /// Requested parent, kept only when it differs from the root
    pub reply_to_comment_id: Option<Uuid>,
}

impl ParentLink {
    /// Link for a top-level comment
    pub const ROOT: ParentLink = ParentLink {
        parent_comment_id: None,
        reply_to_comment_id: None,
    };
}

/// Order of root comments in an assembled article tree.
///
/// Replies inside a thread are always chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootOrder {
    /// Latest thread first, used by the comment listing
    NewestFirst,
    /// Earliest thread first, used by the article detail page
    OldestFirst,
}

/// Resolve the parent linkage of a comment being created on `article_id`.
///
/// `requested_parent` is the comment the user replied to and `target` is that
/// comment as fetched from the store (`None` if it does not exist).
///
/// # Errors
///
/// - `NotFound` if a parent was requested but `target` is `None`
/// - `ValidationError` if `target` belongs to another article
pub fn normalize(
    article_id: Uuid,
    requested_parent: Option<Uuid>,
    target: Option<&Comment>,
) -> Result<ParentLink, SharedError> {
    let Some(requested) = requested_parent else {
        return Ok(ParentLink::ROOT);
    };

    let target = target
        .filter(|t| t.id == requested)
        .ok_or_else(|| SharedError::not_found("parent comment", requested))?;

    if target.article_id != article_id {
        return Err(SharedError::validation(
            "parentCommentId",
            "Parent comment belongs to a different article",
        ));
    }

    match target.parent_comment_id {
        // Replying to a root: it is both the structural and display parent
        None => Ok(ParentLink {
            parent_comment_id: Some(target.id),
            reply_to_comment_id: None,
        }),
        // Replying to a reply: one hop up to its root
        Some(root) => Ok(ParentLink {
            parent_comment_id: Some(root),
            reply_to_comment_id: Some(target.id),
        }),
    }
}

/// Build the full two-level tree for one article.
///
/// Replies whose root is missing, or whose stored parent is not a root, are
/// left out. The call never fails.
pub fn assemble_article(
    comments: &[Comment],
    profiles: &HashMap<Uuid, AuthorProfile>,
    order: RootOrder,
) -> Vec<ThreadNode> {
    let index: HashMap<Uuid, &Comment> = comments.iter().map(|c| (c.id, c)).collect();

    let mut roots: Vec<&Comment> = Vec::new();
    let mut replies_by_root: HashMap<Uuid, Vec<&Comment>> = HashMap::new();

    for comment in comments {
        match comment.parent_comment_id {
            None => roots.push(comment),
            Some(parent) => {
                let attached = index.get(&parent).is_some_and(|p| p.is_root());
                if attached {
                    replies_by_root.entry(parent).or_default().push(comment);
                } else {
                    tracing::debug!(
                        comment_id = %comment.id,
                        parent_id = %parent,
                        "Skipping reply without a root in this article"
                    );
                }
            }
        }
    }

    roots.sort_by_key(|c| c.sort_key());
    if order == RootOrder::NewestFirst {
        roots.reverse();
    }

    roots
        .into_iter()
        .map(|root| {
            let replies = replies_by_root.remove(&root.id).unwrap_or_default();
            build_node(root, replies, &index, profiles)
        })
        .collect()
}

/// Build the single thread rooted at `root`.
///
/// `replies` may contain unrelated comments; only those whose stored parent
/// is `root` are attached.
pub fn assemble_thread(
    root: &Comment,
    replies: &[Comment],
    profiles: &HashMap<Uuid, AuthorProfile>,
) -> ThreadNode {
    let mut index: HashMap<Uuid, &Comment> = replies.iter().map(|c| (c.id, c)).collect();
    index.insert(root.id, root);

    let attached = replies
        .iter()
        .filter(|c| c.id != root.id && c.parent_comment_id == Some(root.id))
        .collect();

    build_node(root, attached, &index, profiles)
}

fn build_node(
    root: &Comment,
    mut replies: Vec<&Comment>,
    index: &HashMap<Uuid, &Comment>,
    profiles: &HashMap<Uuid, AuthorProfile>,
) -> ThreadNode {
    replies.sort_by_key(|c| c.sort_key());

    let root_view = view(root, profiles);
    let replies = replies
        .into_iter()
        .map(|reply| {
            let reply_to = reply
                .reply_to_comment_id
                .and_then(|id| index.get(&id))
                .filter(|target| target.root_id() == root.id)
                .map(|target| view(target, profiles))
                .unwrap_or_else(|| root_view.clone());

            ReplyNode {
                comment: view(reply, profiles),
                reply_to,
            }
        })
        .collect();

    ThreadNode {
        comment: root_view,
        replies,
    }
}

fn view(comment: &Comment, profiles: &HashMap<Uuid, AuthorProfile>) -> CommentView {
    CommentView::from_comment(comment, profiles.get(&comment.author_id).cloned())
}
