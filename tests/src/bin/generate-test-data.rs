use agora_client::{api::PostId, ClientConfig, CommentEngine, FeedKey, HttpRemote};
use anyhow::Context;
use rand::Rng;

const NUM_POSTS: i64 = 5;

const ROOT_COMMENTS_PER_POST: usize = 30;
const MAX_REPLIES_PER_COMMENT: usize = 8;

// Share of comments that get edited, and of replies that get deleted, in percent
const EDIT_RATE: u32 = 10;
const DELETE_RATE: u32 = 5;

const COMMENT_MIN_WORDS: usize = 3;
const COMMENT_MAX_WORDS: usize = 60;

fn gen_comment_text() -> String {
    let words = rand::thread_rng().gen_range(COMMENT_MIN_WORDS..=COMMENT_MAX_WORDS);
    lipsum::lipsum_words(words)
}

fn gen_percent(rate: u32) -> bool {
    rand::thread_rng().gen_range(0..100) < rate
}

async fn gen_thread(engine: &CommentEngine<HttpRemote>, post: PostId) -> anyhow::Result<()> {
    for _ in 0..ROOT_COMMENTS_PER_POST {
        let root = engine
            .create(post, gen_comment_text(), None)
            .await
            .with_context(|| format!("commenting on post {post}"))?;
        let num_replies = rand::thread_rng().gen_range(0..=MAX_REPLIES_PER_COMMENT);
        for _ in 0..num_replies {
            let reply = engine
                .reply(root.id, gen_comment_text())
                .await
                .with_context(|| format!("replying to comment {}", root.id))?;
            if gen_percent(EDIT_RATE) {
                engine
                    .update(reply.id, gen_comment_text())
                    .await
                    .with_context(|| format!("editing comment {}", reply.id))?;
            }
            if gen_percent(DELETE_RATE) {
                engine
                    .delete(reply.id, Some(root.id))
                    .await
                    .with_context(|| format!("deleting comment {}", reply.id))?;
            }
        }
        if gen_percent(EDIT_RATE) {
            engine
                .update(root.id, gen_comment_text())
                .await
                .with_context(|| format!("editing comment {}", root.id))?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = ClientConfig::from_env()?;
    let engine = CommentEngine::new(HttpRemote::new(&config), config.page_size);

    for post in 1..=NUM_POSTS {
        let post = PostId(post);
        gen_thread(&engine, post).await?;
        let feed = engine
            .feed_view(&FeedKey::Root(post))
            .context("post feed disappeared while generating")?;
        tracing::info!(
            %post,
            comments = feed.pagination.total_count,
            "generated comment thread"
        );
    }

    tracing::info!(
        cached = engine.snapshot().num_comments(),
        "done generating test data"
    );
    Ok(())
}
