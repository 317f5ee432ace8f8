/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RedisError {
    #[error("Redis connection failed : {0}")]
    ConnectionError(String),
    #[error("Failed to set key in Redis : {0}")]
    SetFailed(String),
    #[error("Failed to set expiry for key in Redis : {0}")]
    SetExpiryFailed(String),
    #[error("Failed to get key from Redis : {0}")]
    GetFailed(String),
    #[error("Failed to delete key from Redis : {0}")]
    DeleteFailed(String),
    #[error("ZADD failed : {0}")]
    ZAddFailed(String),
    #[error("ZRANGE failed : {0}")]
    ZRangeFailed(String),
    #[error("ZREM failed : {0}")]
    ZRemFailed(String),
    #[error("SADD failed : {0}")]
    SAddFailed(String),
    #[error("SMEMBERS failed : {0}")]
    SMembersFailed(String),
    #[error("SREM failed : {0}")]
    SRemFailed(String),
}
