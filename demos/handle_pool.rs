//! Pen and Brush Pool Demonstration
//!
//! Simulates a drawing layer that needs one native handle per colour. Handles
//! are pooled with a soft limit of 2 and a hard limit of 4, and the run shows
//! sharing, idle retention, transient fallback and eviction sweeps.
//!
//! Run with `RUST_LOG=debug cargo run --example handle_pool` to see the cache's
//! own log lines.

use refcounted_cache::{CacheEntry, CacheMetrics, CacheSource, RefCountedCache};
use std::cell::Cell;
use thiserror::Error;

/// Stand-in for an OS handle.
#[derive(Debug)]
struct NativeBrush {
    handle: u32,
    colour: u32,
}

#[derive(Debug, Error)]
#[error("handle quota exceeded")]
struct HandleQuotaExceeded;

/// Allocates brushes keyed by packed `0xRRGGBB` colour.
#[derive(Default)]
struct BrushFactory {
    next_handle: Cell<u32>,
    live: Cell<u32>,
}

impl CacheSource for BrushFactory {
    type Key = u32;
    type Data = u32;
    type Object = NativeBrush;
    type Error = HandleQuotaExceeded;

    fn create_entry(&self, colour: &u32, cached: bool) -> Result<(u32, NativeBrush), Self::Error> {
        if self.live.get() >= 16 {
            return Err(HandleQuotaExceeded);
        }
        let handle = self.next_handle.get() + 1;
        self.next_handle.set(handle);
        self.live.set(self.live.get() + 1);
        println!(
            "   + created handle {handle} for #{colour:06x}{}",
            if cached { "" } else { " (transient)" }
        );
        Ok((
            *colour,
            NativeBrush {
                handle,
                colour: *colour,
            },
        ))
    }

    fn is_match(&self, colour: &u32, entry: &CacheEntry<Self>) -> bool {
        entry.data() == colour
    }

    fn release_entry(&self, entry: CacheEntry<Self>) -> Result<(), Self::Error> {
        let (_, brush) = entry.into_parts();
        self.live.set(self.live.get() - 1);
        println!(
            "   - released handle {} for #{:06x}",
            brush.handle, brush.colour
        );
        Ok(())
    }
}

const PALETTE: [u32; 5] = [0xff0000, 0x00ff00, 0x0000ff, 0xffff00, 0xff00ff];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Brush pool: soft limit 2, hard limit 4\n");
    let cache = RefCountedCache::new(2, 4, BrushFactory::default())?;

    println!("1. Two widgets paint red at once");
    {
        let a = cache.get_entry(&PALETTE[0])?;
        let b = cache.get_entry(&PALETTE[0])?;
        println!(
            "   both hold handle {} (ref_count {})",
            a.handle,
            b.ref_count()
        );
    }
    println!("   red is idle but still pooled: {} pooled\n", cache.len());

    println!("2. Five colours held at once");
    let held = PALETTE
        .iter()
        .map(|colour| cache.get_entry(colour))
        .collect::<Result<Vec<_>, _>>()?;
    for scope in &held {
        println!(
            "   #{:06x} -> handle {} cached={}",
            scope.colour,
            scope.handle,
            scope.is_cached()
        );
    }
    drop(held);
    println!("   after release: {} pooled, {} idle\n", cache.len(), cache.idle_count());

    println!("3. A new colour triggers a sweep down to the soft limit");
    {
        let teal = cache.get_entry(&0x008080)?;
        println!("   teal got handle {}", teal.handle);
    }
    println!("   {} pooled\n", cache.len());

    println!("4. Trim everything idle");
    let trimmed = cache.trim()?;
    println!("   trimmed {trimmed}, {} pooled\n", cache.len());

    println!("Metrics:");
    for (name, value) in cache.metrics() {
        println!("   {name:<20} {value:.2}");
    }

    Ok(())
}
