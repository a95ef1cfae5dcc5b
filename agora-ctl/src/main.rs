use agora_client::{
    api::{Comment, CommentId, PostId},
    ClientConfig, CommentEngine, FeedKey, FeedView, HttpRemote,
};
use anyhow::Context;

#[derive(structopt::StructOpt)]
struct Opt {
    #[structopt(short, long)]
    host: String,

    /// Number of comments fetched per page
    #[structopt(long, default_value = "20")]
    page_size: u32,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(structopt::StructOpt)]
enum Command {
    /// List the root comments of a post
    List {
        post: i64,

        #[structopt(long, default_value = "1")]
        page: u32,
    },

    /// List the replies to a comment
    Replies {
        comment: i64,

        #[structopt(long, default_value = "1")]
        page: u32,
    },

    /// Comment on a post
    Post { post: i64, body: String },

    /// Reply to a comment
    Reply { comment: i64, body: String },

    /// Replace the body of a comment
    Edit { comment: i64, body: String },

    /// Delete a comment
    Delete {
        comment: i64,

        /// Comment the deleted one replies to
        #[structopt(long)]
        parent: Option<i64>,
    },
}

fn config(opt: &Opt) -> anyhow::Result<ClientConfig> {
    let mut config = ClientConfig::new(opt.host.clone());
    config.page_size = opt.page_size;
    config.token = ClientConfig::token_from_env()?;
    Ok(config)
}

fn print_comment(c: &Comment) {
    let edited = if c.is_edited { " (edited)" } else { "" };
    println!(
        "#{} by {} at {}{}, {} replies, {} likes",
        c.id, c.author.display_name, c.created_at, edited, c.children_count, c.like_count
    );
    for line in c.body.lines() {
        println!("    {line}");
    }
}

fn print_feed(view: &FeedView) {
    println!(
        "{}: page {}/{}, {} comments",
        view.key,
        view.pagination.current_page,
        view.pagination.total_pages,
        view.pagination.total_count
    );
    for c in view.items.iter() {
        print_comment(c);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let opt = <Opt as structopt::StructOpt>::from_args();
    let config = config(&opt)?;
    let engine = CommentEngine::new(HttpRemote::new(&config), config.page_size);

    match opt.cmd {
        Command::List { post, page } => {
            let view = engine
                .load_page(FeedKey::Root(PostId(post)), page, config.page_size, false)
                .await
                .with_context(|| format!("listing comments of post {post}"))?;
            print_feed(&view);
        }
        Command::Replies { comment, page } => {
            let view = engine
                .load_page(
                    FeedKey::Children(CommentId(comment)),
                    page,
                    config.page_size,
                    false,
                )
                .await
                .with_context(|| format!("listing replies to comment {comment}"))?;
            print_feed(&view);
        }
        Command::Post { post, body } => {
            let c = engine
                .create(PostId(post), body, None)
                .await
                .with_context(|| format!("commenting on post {post}"))?;
            print_comment(&c);
        }
        Command::Reply { comment, body } => {
            let c = engine
                .reply(CommentId(comment), body)
                .await
                .with_context(|| format!("replying to comment {comment}"))?;
            print_comment(&c);
        }
        Command::Edit { comment, body } => {
            let c = engine
                .update(CommentId(comment), body)
                .await
                .with_context(|| format!("editing comment {comment}"))?;
            print_comment(&c);
        }
        Command::Delete { comment, parent } => {
            engine
                .delete(CommentId(comment), parent.map(CommentId))
                .await
                .with_context(|| format!("deleting comment {comment}"))?;
            println!("deleted comment #{comment}");
        }
    }

    Ok(())
}
