use crate::{
    api::{BoardApi, ReorderStatusesRequest, UpdateTaskRequest},
    config::ClientConfig,
    domain::{Board, BoardId, Status, StatusId, Task, TaskId},
    error::{BoardError, Result},
};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

/// REST backend for boards
pub struct HttpBoardApi {
    client: Client,
    config: ClientConfig,
}

impl HttpBoardApi {
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(transport)?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.config.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await.map_err(transport)?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "board api response");

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BoardError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        Ok(serde_json::from_slice(&body)?)
    }
}

fn transport(err: reqwest::Error) -> BoardError {
    BoardError::Transport(err.to_string())
}

#[async_trait]
impl BoardApi for HttpBoardApi {
    async fn fetch_board(&self, board_id: BoardId) -> Result<Board> {
        self.send(self.request(Method::GET, &format!("boards/{}", board_id)))
            .await
    }

    async fn fetch_statuses(&self, board_id: BoardId) -> Result<Vec<Status>> {
        self.send(self.request(Method::GET, &format!("boards/{}/statuses", board_id)))
            .await
    }

    async fn fetch_tasks(&self, board_id: BoardId) -> Result<Vec<Task>> {
        let builder = self
            .request(Method::GET, "tasks")
            .query(&[("boardId", board_id.get())]);
        self.send(builder).await
    }

    async fn reorder_statuses(
        &self,
        board_id: BoardId,
        status_ids: Vec<StatusId>,
    ) -> Result<Vec<Status>> {
        let builder = self
            .request(Method::PUT, &format!("boards/{}/statuses/order", board_id))
            .json(&ReorderStatusesRequest { status_ids });
        self.send(builder).await
    }

    async fn update_task(&self, task_id: TaskId, request: UpdateTaskRequest) -> Result<Task> {
        let builder = self
            .request(Method::PUT, &format!("tasks/{}", task_id))
            .json(&request);
        self.send(builder).await
    }
}
