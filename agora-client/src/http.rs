use async_trait::async_trait;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};

use crate::{
    api::{
        AuthToken, Comment, CommentBody, CommentEnvelope, CommentId, CommentPage, Error,
        ListQuery, NewComment, PostId, Remote,
    },
    ClientConfig,
};

/// [`Remote`] talking JSON to an actual server
pub struct HttpRemote {
    client: ClientWithMiddleware,
    host: String,
    token: Option<AuthToken>,
}

impl HttpRemote {
    pub fn new(config: &ClientConfig) -> HttpRemote {
        let retry_policy =
            ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(reqwest::Client::new())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();
        HttpRemote {
            client,
            host: String::from(config.host.trim_end_matches('/')),
            token: config.token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.host, path)
    }

    async fn send(&self, req: RequestBuilder) -> Result<reqwest::Response, Error> {
        let req = match self.token {
            Some(tok) => req.bearer_auth(tok.0),
            None => req,
        };
        let resp = req
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp
            .bytes()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        Err(Error::parse(&body).unwrap_or_else(|err| {
            tracing::warn!(%status, ?err, "server answered with an unparsable error");
            Error::Unknown(format!("server answered {status}"))
        }))
    }

    async fn fetch<R>(&self, req: RequestBuilder) -> Result<R, Error>
    where
        R: for<'de> serde::Deserialize<'de>,
    {
        self.send(req)
            .await?
            .json()
            .await
            .map_err(|e| Error::Transport(format!("parsing server response: {e}")))
    }

    async fn list(&self, path: String, query: ListQuery) -> Result<CommentPage, Error> {
        tracing::debug!(%path, ?query, "listing comments");
        self.fetch(self.client.get(self.url(&path)).query(&query))
            .await
    }
}

#[async_trait]
impl Remote for HttpRemote {
    async fn list_root_comments(
        &self,
        post: PostId,
        page: u32,
        per_page: u32,
    ) -> Result<CommentPage, Error> {
        let query = ListQuery {
            page,
            per_page,
            parent_id: None,
        };
        self.list(format!("posts/{post}/comments"), query).await
    }

    async fn list_replies(
        &self,
        parent: CommentId,
        page: u32,
        per_page: u32,
    ) -> Result<CommentPage, Error> {
        let query = ListQuery {
            page,
            per_page,
            parent_id: Some(parent),
        };
        self.list(String::from("comments"), query).await
    }

    async fn create_comment(&self, post: PostId, body: String) -> Result<Comment, Error> {
        let req = self
            .client
            .post(self.url(&format!("posts/{post}/comments")))
            .json(&NewComment::root(body));
        Ok(self.fetch::<CommentEnvelope>(req).await?.comment)
    }

    async fn create_reply(&self, parent: CommentId, body: String) -> Result<Comment, Error> {
        let req = self
            .client
            .post(self.url(&format!("comments/{parent}/replies")))
            .json(&CommentBody { body });
        Ok(self.fetch::<CommentEnvelope>(req).await?.comment)
    }

    async fn fetch_comment(&self, id: CommentId) -> Result<Comment, Error> {
        self.fetch(self.client.get(self.url(&format!("comments/{id}"))))
            .await
    }

    async fn update_comment(&self, id: CommentId, body: String) -> Result<Comment, Error> {
        let req = self
            .client
            .put(self.url(&format!("comments/{id}")))
            .json(&CommentBody { body });
        Ok(self.fetch::<CommentEnvelope>(req).await?.comment)
    }

    async fn delete_comment(&self, id: CommentId) -> Result<(), Error> {
        self.send(self.client.delete(self.url(&format!("comments/{id}"))))
            .await?;
        Ok(())
    }
}
