// RasterView -- Display compositing and viewport transform core for tiled raster images
//
// Copyright (c) 2024-2025 Martin van der Werff <github (at) newinnovations.nl>
//
// This file is part of RasterView.
//
// RasterView is free software: you can redistribute it and/or modify it under the terms of
// the GNU Affero General Public License as published by the Free Software Foundation, either
// version 3 of the License, or (at your option) any later version.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS" AND ANY EXPRESS OR
// IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE IMPLIED WARRANTIES OF MERCHANTABILITY AND
// FITNESS FOR A PARTICULAR PURPOSE ARE DISCLAIMED. IN NO EVENT SHALL THE AUTHOR BE LIABLE FOR ANY
// DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT
// LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR
// BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT,
// STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

//! Marshaling of damage notifications from foreign threads.
//!
//! All viewport, scroll, and damage state is owned by one thread. Mutators
//! running elsewhere (a background filter finishing a stroke) must not call
//! into that state directly; they get a cloneable [`DamageSender`] and the
//! owning thread drains the channel at its own pace.

pub mod model;
mod sender;

use std::sync::{atomic::AtomicU32, Arc};

use async_channel::Receiver;

use crate::notify::model::DamageMessage;

pub use self::sender::DamageSender;

/// Creates the unbounded damage channel. The receiver half belongs to the
/// owning session; senders are cloned from the returned sender.
pub fn damage_channel() -> (DamageSender, Receiver<DamageMessage>) {
    let (tx, rx) = async_channel::unbounded();
    let counter = Arc::new(AtomicU32::new(0));
    (DamageSender::new(tx, counter), rx)
}
