//! Command line arguments

use blog_core::{CommentStatus, CounterKind, EntityId, RelationshipKind};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[clap(author, version, about = "Blog ledger administration")]
pub struct Cli {
    /// Emit JSON logs regardless of APP_ENV
    #[clap(long, global = true)]
    pub json_logs: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Apply the database schema
    Migrate,

    /// Compare stored counters with a recount of their rows
    Audit {
        /// Counter to check: article_likes, article_favorites, comment_likes,
        /// comment_replies, user_followers, user_following
        #[clap(long, value_parser = parse_counter_kind)]
        kind: CounterKind,

        /// Only check this owner instead of every row
        #[clap(long, value_parser = parse_entity_id)]
        owner: Option<EntityId>,

        /// Overwrite drifted counters with the recount
        #[clap(long)]
        repair: bool,
    },

    /// List comments written by a user, newest first
    Comments {
        #[clap(long, value_parser = parse_entity_id)]
        author: EntityId,

        /// normal, reported, or deleted; defaults to every comment not deleted
        #[clap(long, value_parser = parse_comment_status)]
        status: Option<CommentStatus>,
    },

    /// List live comments on an article with their authors
    Commenters {
        #[clap(long, value_parser = parse_entity_id)]
        article: EntityId,
    },

    /// List who holds a relationship on a target, newest first
    Relations {
        #[clap(long, value_parser = parse_entity_id)]
        target: EntityId,

        /// like, favorite, follow, or comment_like
        #[clap(long, value_parser = parse_relationship_kind)]
        kind: RelationshipKind,
    },

    /// Show the follow relationship between two users in both directions
    FollowStatus {
        #[clap(long, value_parser = parse_entity_id)]
        user: EntityId,

        #[clap(long, value_parser = parse_entity_id)]
        other: EntityId,
    },
}

fn parse_counter_kind(s: &str) -> Result<CounterKind, String> {
    CounterKind::parse(s).ok_or_else(|| format!("unknown counter kind '{s}'"))
}

fn parse_comment_status(s: &str) -> Result<CommentStatus, String> {
    CommentStatus::parse(s).ok_or_else(|| format!("unknown comment status '{s}'"))
}

fn parse_relationship_kind(s: &str) -> Result<RelationshipKind, String> {
    RelationshipKind::parse(s).ok_or_else(|| format!("unknown relationship kind '{s}'"))
}

fn parse_entity_id(s: &str) -> Result<EntityId, String> {
    EntityId::parse(s).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_audit_command() {
        let cli = Cli::try_parse_from([
            "blog-admin",
            "audit",
            "--kind",
            "article_likes",
            "--owner",
            "10",
            "--repair",
        ])
        .unwrap();

        match cli.command {
            Command::Audit { kind, owner, repair } => {
                assert_eq!(kind, CounterKind::ArticleLikes);
                assert_eq!(owner, Some(EntityId::new(10)));
                assert!(repair);
            }
            other => panic!("expected audit, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_unknown_counter() {
        assert!(Cli::try_parse_from(["blog-admin", "audit", "--kind", "claps"]).is_err());
    }

    #[test]
    fn test_rejects_invalid_owner() {
        let args = ["blog-admin", "audit", "--kind", "user_followers", "--owner", "-3"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_parse_comments_command() {
        let cli = Cli::try_parse_from(["blog-admin", "comments", "--author", "5", "--status", "reported"])
            .unwrap();
        match cli.command {
            Command::Comments { author, status } => {
                assert_eq!(author, EntityId::new(5));
                assert_eq!(status, Some(CommentStatus::Reported));
            }
            other => panic!("expected comments, got {other:?}"),
        }

        let cli = Cli::try_parse_from(["blog-admin", "comments", "--author", "5"]).unwrap();
        assert!(matches!(cli.command, Command::Comments { status: None, .. }));

        let args = ["blog-admin", "comments", "--author", "5", "--status", "hidden"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_parse_listing_commands() {
        let cli = Cli::try_parse_from(["blog-admin", "relations", "--target", "10", "--kind", "comment_like"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Command::Relations {
                kind: RelationshipKind::CommentLike,
                ..
            }
        ));

        let cli = Cli::try_parse_from(["blog-admin", "follow-status", "--user", "5", "--other", "6"]).unwrap();
        match cli.command {
            Command::FollowStatus { user, other } => {
                assert_eq!(user, EntityId::new(5));
                assert_eq!(other, EntityId::new(6));
            }
            other => panic!("expected follow-status, got {other:?}"),
        }

        let cli = Cli::try_parse_from(["blog-admin", "commenters", "--article", "abc"]);
        assert!(cli.is_err());
        let cli = Cli::try_parse_from(["blog-admin", "commenters", "--article", "10"]).unwrap();
        assert!(matches!(cli.command, Command::Commenters { .. }));
    }

    #[test]
    fn test_parse_migrate() {
        let cli = Cli::try_parse_from(["blog-admin", "migrate", "--json-logs"]).unwrap();
        assert!(matches!(cli.command, Command::Migrate));
        assert!(cli.json_logs);
    }
}
