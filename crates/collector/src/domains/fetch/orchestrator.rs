use slog::{debug, error, info, warn, Logger};
use std::sync::Arc;
use tokio::{
    sync::{mpsc, Semaphore},
    task::JoinSet,
};

use crate::{
    ArchiveClient, CoordinatePatcher, Error, Observation, ObservationParser, ParseError,
    PartitionRequest, RetryPolicy, Span,
};

pub const DEFAULT_NETWORKS: [&str; 12] = [
    "SA__ASOS", "KW__ASOS", "AE__ASOS", "QA__ASOS", "BH__ASOS", "OM__ASOS", "YE__ASOS",
    "JO__ASOS", "IQ__ASOS", "SY__ASOS", "LB__ASOS", "IR__ASOS",
];

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub networks: Vec<String>,
    pub network_chunk_size: usize,
    pub window_span_days: u32,
    pub max_in_flight: usize,
    pub retry: RetryPolicy,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            networks: DEFAULT_NETWORKS.iter().map(|n| n.to_string()).collect(),
            network_chunk_size: 4,
            window_span_days: 10,
            max_in_flight: 4,
            retry: RetryPolicy::default(),
        }
    }
}

type PartitionOutcome = (usize, Result<Vec<Observation>, ParseError>);

/// Fans a span out over (sub-window x network group) partitions, keeping only
/// dust and sand reports from each response.
pub struct FetchOrchestrator {
    logger: Logger,
    client: Arc<dyn ArchiveClient>,
    parser: Arc<dyn ObservationParser>,
    patcher: Arc<CoordinatePatcher>,
    config: FetchConfig,
}

impl FetchOrchestrator {
    pub fn new(
        logger: Logger,
        client: Arc<dyn ArchiveClient>,
        parser: Arc<dyn ObservationParser>,
        patcher: Arc<CoordinatePatcher>,
        config: FetchConfig,
    ) -> Result<Self, Error> {
        if config.network_chunk_size == 0 || config.window_span_days == 0 {
            return Err(Error::InvalidInput(String::from(
                "network_chunk_size and window_span_days must be greater than zero",
            )));
        }
        if config.max_in_flight == 0 {
            return Err(Error::InvalidInput(String::from(
                "max_in_flight must be greater than zero",
            )));
        }
        Ok(Self {
            logger,
            client,
            parser,
            patcher,
            config,
        })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Every request needed to cover `span`, sub-windows outermost.
    pub fn partitions(&self, span: Span) -> Vec<PartitionRequest> {
        let groups: Vec<&[String]> = self
            .config
            .networks
            .chunks(self.config.network_chunk_size)
            .collect();

        span.split(self.config.window_span_days)
            .into_iter()
            .flat_map(|piece| {
                groups.iter().map(move |networks| PartitionRequest {
                    networks: networks.to_vec(),
                    span: piece,
                })
            })
            .collect()
    }

    /// Classified observations for `span`, in partition order. Partitions that
    /// keep failing contribute nothing; a malformed payload fails the whole call.
    pub async fn fetch(&self, span: Span) -> Result<Vec<Observation>, Error> {
        let partitions = self.partitions(span);
        let total_requests = partitions.len();
        if total_requests == 0 {
            return Ok(vec![]);
        }
        info!(
            self.logger,
            "fetching {} partitions ({} in flight)", total_requests, self.config.max_in_flight
        );

        let (tx, mut rx) = mpsc::channel::<PartitionOutcome>(total_requests);
        let semaphore = Arc::new(Semaphore::new(self.config.max_in_flight));
        let mut set = JoinSet::new();

        for (index, request) in partitions.into_iter().enumerate() {
            let tx = tx.clone();
            let semaphore = Arc::clone(&semaphore);
            let client = Arc::clone(&self.client);
            let parser = Arc::clone(&self.parser);
            let patcher = Arc::clone(&self.patcher);
            let retry = self.config.retry;
            let logger = self.logger.clone();

            set.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                let label = request.label();
                let outcome = match retry
                    .run(&logger, &label, |_| client.fetch(&request))
                    .await
                {
                    Ok(body) => extract(&logger, parser.as_ref(), &patcher, &body),
                    Err(err) => {
                        warn!(logger, "giving up on {}: {}", label, err);
                        Ok(vec![])
                    }
                };
                if let Err(err) = tx.send((index, outcome)).await {
                    error!(logger, "error sending result through channel: {}", err);
                }
            });
        }

        // Drop the sender so the channel closes when all tasks complete
        drop(tx);

        let mut batches: Vec<Vec<Observation>> = vec![Vec::new(); total_requests];
        while let Some((index, outcome)) = rx.recv().await {
            match outcome {
                Ok(observations) => batches[index] = observations,
                Err(err) => {
                    error!(self.logger, "malformed payload, aborting fetch: {}", err);
                    set.abort_all();
                    return Err(Error::Parse(err));
                }
            }
        }
        while let Some(joined) = set.join_next().await {
            if let Err(err) = joined {
                error!(self.logger, "partition task failed: {}", err);
            }
        }

        let observations: Vec<Observation> = batches.into_iter().flatten().collect();
        info!(self.logger, "classified observations: {}", observations.len());
        Ok(observations)
    }
}

/// Parse one payload, patching coordinates and dropping non-dust rows as they
/// stream past. Rows without a station or timestamp are skipped.
fn extract(
    logger: &Logger,
    parser: &dyn ObservationParser,
    patcher: &CoordinatePatcher,
    body: &str,
) -> Result<Vec<Observation>, ParseError> {
    let mut kept = Vec::new();
    let mut rows = 0;
    for row in parser.parse(body)? {
        rows += 1;
        let mut observation = match row {
            Ok(observation) => observation,
            Err(ParseError::MissingValue(column)) => {
                debug!(logger, "skipping row {} without {}", rows, column);
                continue;
            }
            Err(err) => return Err(err),
        };
        patcher.patch(&mut observation);
        if observation.is_dust() {
            kept.push(observation);
        }
    }
    debug!(logger, "rows: {}, kept: {}", rows, kept.len());
    Ok(kept)
}
