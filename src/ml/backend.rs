// ============================================================
// Layer 5 — Backend Selection
// ============================================================
// All model, training and evaluation code is generic over Burn's
// Backend / AutodiffBackend traits. This is the one place that
// names concrete backends:
//
//   wgpu    — GPU through WebGPU (Vulkan / Metal / DX12)
//   ndarray — pure-Rust CPU fallback, also used by the tests
//
// Training wraps the chosen backend in Autodiff; evaluation and
// prediction run on the plain backend.

use burn::backend::{
    ndarray::NdArrayDevice,
    wgpu::WgpuDevice,
    Autodiff, NdArray, Wgpu,
};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub type WgpuBackend      = Wgpu;
pub type WgpuAutodiff     = Autodiff<Wgpu>;
pub type NdArrayBackend   = NdArray;
pub type NdArrayAutodiff  = Autodiff<NdArray>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Wgpu,
    Ndarray,
}

pub fn wgpu_device() -> WgpuDevice {
    let device = WgpuDevice::default();
    tracing::info!("Using WGPU device: {:?}", device);
    device
}

pub fn ndarray_device() -> NdArrayDevice {
    tracing::info!("Using NdArray CPU backend");
    NdArrayDevice::Cpu
}
