use serde::Deserialize;

/// 친구 추가 요청: `POST /api/v1/friends`
#[derive(Debug, Deserialize)]
pub struct AddFriendRequest {
    pub username: String,
}
