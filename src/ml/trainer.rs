// ============================================================
// Layer 5 — Training Loops
// ============================================================
// Two loops on top of Burn's DataLoader and Adam:
//
//   train_decoder — utterance → frozen encoder → state → decoder,
//                   teacher-forced over [<eos>, reply] → [reply, <eos>]
//   train_encoder — next-token language model over raw sentences
//
// The encoder is run on the inner (non-autodiff) backend, so no
// gradient reaches it and its dropout is off. After every epoch
// the model is saved to `<model_dir>/model.mpk` and one row is
// appended to `<model_dir>/metrics.csv`.

use anyhow::{bail, Result};
use burn::{
    data::dataloader::DataLoaderBuilder,
    grad_clipping::GradientClippingConfig,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use std::path::Path;

use crate::application::config::TrainConfig;
use crate::data::{
    batcher::{PairBatcher, SentenceBatcher},
    dataset::{PairDataset, SentenceDataset},
};
use crate::domain::dictionary::Dictionary;
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::{EpochMetrics, MetricsLogger},
};
use crate::ml::{
    classifier::{encode, sequence_loss},
    inferencer::generate_reply,
    recurrent::{RecurrentLm, RnnState},
};

/// A trained model and the mean loss of its last epoch
/// (`None` when no epoch ran).
pub struct Trained<M> {
    pub model:      M,
    pub final_loss: Option<f64>,
}

fn adam(cfg: &TrainConfig) -> AdamConfig {
    let clip = (cfg.grad_clip > 0.0).then_some(GradientClippingConfig::Norm(cfg.grad_clip));
    AdamConfig::new().with_grad_clipping(clip)
}

fn inner_device<B: AutodiffBackend>(device: &B::Device) -> <B::InnerBackend as Backend>::Device {
    Tensor::<B, 1>::zeros([1], device).inner().device()
}

fn lift_state<B: AutodiffBackend>(state: RnnState<B::InnerBackend>) -> RnnState<B> {
    RnnState {
        hidden: Tensor::from_inner(state.hidden),
        cell:   state.cell.map(Tensor::from_inner),
    }
}

/// Save weights and metrics for one finished epoch.
fn finish_epoch<B: Backend, M: Module<B>>(
    model:   &M,
    epoch:   usize,
    loss:    f64,
    ckpt:    &CheckpointManager,
    metrics: &MetricsLogger,
) -> Result<()> {
    ckpt.save_model(model)?;
    metrics.log(&EpochMetrics::new(epoch, loss))
}

fn mean(sum: f64, count: usize) -> f64 {
    if count > 0 { sum / count as f64 } else { f64::NAN }
}

/// Train `decoder` on `dataset` with `encoder` held fixed.
pub fn train_decoder<B, M>(
    cfg:        &TrainConfig,
    encoder:    &M,
    mut decoder: M,
    dataset:    PairDataset,
    dictionary: &Dictionary,
    device:     &B::Device,
) -> Result<Trained<M>>
where
    B: AutodiffBackend,
    M: RecurrentLm<B> + AutodiffModule<B>,
    M::InnerModule: RecurrentLm<B::InnerBackend>,
{
    let Some(sample) = dataset.first().cloned() else {
        bail!("no conversation pairs to train the decoder on");
    };
    let model_dir = cfg.decoder_model_dir.as_path();
    let (ckpt, metrics) = epoch_sinks(cfg, model_dir)?;

    let frozen       = encoder.valid();
    let inner_device = inner_device::<B>(device);

    let loader = DataLoaderBuilder::new(PairBatcher::<B>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .shuffle(42)
        .num_workers(1)
        .build(dataset);

    let mut optim = adam(cfg).init();
    let mut final_loss = None;

    tracing::info!(
        "Training decoder: epochs={}, batch_size={}, lr={}",
        cfg.epoch_size,
        cfg.batch_size,
        cfg.learning_rate
    );

    for epoch in 1..=cfg.epoch_size {
        let mut loss_sum = 0.0f64;
        let mut batches  = 0usize;

        for batch in loader.iter() {
            let state = encode(&frozen, batch.source.inner(), &batch.source_lengths);
            let loss  = sequence_loss(
                &decoder,
                batch.decoder_input,
                batch.decoder_target,
                lift_state::<B>(state),
            );

            loss_sum += loss.clone().into_scalar().elem::<f64>();
            batches  += 1;

            let grads = GradientsParams::from_grads(loss.backward(), &decoder);
            decoder = optim.step(cfg.learning_rate, decoder, grads);
        }

        let avg_loss = mean(loss_sum, batches);
        tracing::info!(
            "Epoch {:>3}/{} | train_loss={:.4} | perplexity={:.2}",
            epoch,
            cfg.epoch_size,
            avg_loss,
            avg_loss.exp()
        );
        finish_epoch(&decoder, epoch, avg_loss, &ckpt, &metrics)?;

        let reply = generate_reply(
            &frozen,
            &decoder.valid(),
            &sample.source,
            cfg.max_reply_len,
            &inner_device,
        );
        tracing::info!(
            "sample: '{}' → '{}'",
            dictionary.decode(&sample.source).join(" "),
            dictionary.decode(&reply).join(" ")
        );
        final_loss = Some(avg_loss);
    }

    tracing::info!("Decoder training complete");
    Ok(Trained { model: decoder, final_loss })
}

/// Train `model` as a next-token language model over `dataset`.
pub fn train_encoder<B, M>(
    cfg:       &TrainConfig,
    mut model: M,
    dataset:   SentenceDataset,
    device:    &B::Device,
) -> Result<Trained<M>>
where
    B: AutodiffBackend,
    M: RecurrentLm<B> + AutodiffModule<B>,
{
    if burn::data::dataset::Dataset::is_empty(&dataset) {
        bail!("no sentences to train the encoder on");
    }
    let model_dir = cfg.encoder_model_dir.as_path();
    let (ckpt, metrics) = epoch_sinks(cfg, model_dir)?;

    let loader = DataLoaderBuilder::new(SentenceBatcher::<B>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .shuffle(42)
        .num_workers(1)
        .build(dataset);

    let mut optim = adam(cfg).init();
    let mut final_loss = None;

    tracing::info!(
        "Training encoder: epochs={}, batch_size={}, lr={}",
        cfg.epoch_size,
        cfg.batch_size,
        cfg.learning_rate
    );

    for epoch in 1..=cfg.epoch_size {
        let mut loss_sum = 0.0f64;
        let mut batches  = 0usize;

        for batch in loader.iter() {
            let [batch_size, _] = batch.input.dims();
            let state = model.initial_state(batch_size, device);
            let loss  = sequence_loss(&model, batch.input, batch.target, state);

            loss_sum += loss.clone().into_scalar().elem::<f64>();
            batches  += 1;

            let grads = GradientsParams::from_grads(loss.backward(), &model);
            model = optim.step(cfg.learning_rate, model, grads);
        }

        let avg_loss = mean(loss_sum, batches);
        tracing::info!(
            "Epoch {:>3}/{} | train_loss={:.4} | perplexity={:.2}",
            epoch,
            cfg.epoch_size,
            avg_loss,
            avg_loss.exp()
        );
        finish_epoch(&model, epoch, avg_loss, &ckpt, &metrics)?;
        final_loss = Some(avg_loss);
    }

    tracing::info!("Encoder training complete");
    Ok(Trained { model, final_loss })
}

fn epoch_sinks(cfg: &TrainConfig, model_dir: &Path) -> Result<(CheckpointManager, MetricsLogger)> {
    let ckpt = CheckpointManager::new(model_dir);
    ckpt.save_config(cfg)?;
    Ok((ckpt, MetricsLogger::new(model_dir)?))
}
