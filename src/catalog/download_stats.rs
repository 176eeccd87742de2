use super::DownloadStats;
use crate::Result;
use ohno::IntoAppError;
use tokio_postgres::{Client, NoTls};

const LOG_TARGET: &str = "  database";

/// Every file download of a dataset leaves one guestbook response behind.
const DOWNLOAD_COUNT_QUERY: &str = "SELECT COUNT(*) FROM guestbookresponse WHERE dataset_id = $1";

/// Download counts read from the Dataverse database.
pub struct PostgresDownloadStats {
    client: Client,
}

impl core::fmt::Debug for PostgresDownloadStats {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PostgresDownloadStats").finish_non_exhaustive()
    }
}

impl PostgresDownloadStats {
    /// Connect to the Dataverse database.
    ///
    /// The connection is driven by a background task for as long as the returned value lives.
    pub async fn connect(connection_string: &str) -> Result<Self> {
        let (client, connection) = tokio_postgres::connect(connection_string, NoTls)
            .await
            .into_app_err("unable to connect to the Dataverse database")?;

        let _ = tokio::spawn(async move {
            if let Err(e) = connection.await {
                log::error!(target: LOG_TARGET, "Dataverse database connection failed: {e}");
            }
        });

        log::debug!(target: LOG_TARGET, "Connected to the Dataverse database");
        Ok(Self { client })
    }
}

fn parse_dataset_id(member_id: &str) -> Result<i64> {
    member_id
        .parse::<i64>()
        .into_app_err_with(|| format!("dataset id '{member_id}' is not a database id"))
}

impl DownloadStats for PostgresDownloadStats {
    async fn download_count(&self, member_id: &str) -> Result<u64> {
        let dataset_id = parse_dataset_id(member_id)?;

        let row = self
            .client
            .query_one(DOWNLOAD_COUNT_QUERY, &[&dataset_id])
            .await
            .into_app_err_with(|| format!("counting downloads of dataset {member_id}"))?;

        let count: i64 = row.try_get(0).into_app_err("unexpected download count column")?;
        u64::try_from(count).into_app_err_with(|| format!("negative download count for dataset {member_id}"))
    }
}
