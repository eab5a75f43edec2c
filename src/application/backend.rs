// ============================================================
// Layer 2 — Backend Selection
// ============================================================
// --gpu N with N >= 0 trains on GPU adapter N through WGPU;
// a negative value trains on the CPU with ndarray.

use burn::backend::{
    ndarray::NdArrayDevice,
    wgpu::WgpuDevice,
    Autodiff, NdArray, Wgpu,
};

pub type CpuBackend = Autodiff<NdArray>;
pub type GpuBackend = Autodiff<Wgpu>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accelerator {
    Cpu,
    Gpu(usize),
}

impl Accelerator {
    pub fn from_gpu_flag(gpu: i32) -> Self {
        usize::try_from(gpu).map_or(Self::Cpu, Self::Gpu)
    }

    pub fn cpu_device() -> NdArrayDevice {
        NdArrayDevice::Cpu
    }

    pub fn gpu_device(index: usize) -> WgpuDevice {
        WgpuDevice::DiscreteGpu(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_flag_means_cpu() {
        assert_eq!(Accelerator::from_gpu_flag(-1), Accelerator::Cpu);
        assert_eq!(Accelerator::from_gpu_flag(-7), Accelerator::Cpu);
    }

    #[test]
    fn test_gpu_index() {
        assert_eq!(Accelerator::from_gpu_flag(0), Accelerator::Gpu(0));
        assert_eq!(Accelerator::from_gpu_flag(2), Accelerator::Gpu(2));
    }
}
