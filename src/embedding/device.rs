use candle_core::Device;
use tracing::{info, warn};

/// Picks the compute device shared by every ensemble member.
///
/// Metal is tried before CUDA; when neither backend is compiled in or neither device
/// opens, inference runs on the CPU. Never fails: a missing GPU only costs latency.
pub fn select_device() -> Device {
    #[allow(unused_mut)]
    let mut failures: Vec<String> = Vec::new();

    #[cfg(feature = "metal")]
    {
        match Device::new_metal(0) {
            Ok(device) => {
                info!(backend = "metal", "Using GPU acceleration for embeddings");
                return device;
            }
            Err(e) => failures.push(format!("metal: {e}")),
        }
    }

    #[cfg(feature = "cuda")]
    {
        match Device::new_cuda(0) {
            Ok(device) => {
                info!(backend = "cuda", "Using GPU acceleration for embeddings");
                return device;
            }
            Err(e) => failures.push(format!("cuda: {e}")),
        }
    }

    if failures.is_empty() {
        info!("No GPU backend compiled, embedding on CPU");
    } else {
        warn!(reason = %failures.join("; "), "GPU unavailable, embedding on CPU");
    }

    Device::Cpu
}
