//! Link order.
//!
//! Every library and translation unit of the original image, declared in
//! the order the shipping linker consumed them. The table is constant; the
//! only per-run variation comes from the assembler's selected release
//! (matching rules and the core library's structural edit).

use crate::error::Result;
use crate::library::{Library, LibraryAssembler};
use crate::object::MatchingRule::{ExceptIn, NewerThan};
use crate::object::{Object, MATCHING, NON_MATCHING};

/// Assemble the full library list for the assembler's selected release.
pub fn link_order(assembler: &LibraryAssembler) -> Result<Vec<Library>> {
    Ok(vec![
        assembler.simulator(
            "Core",
            vec![
                Object::new(MATCHING, "emulator/Core/xlCoreGCN.c"),
                Object::new(MATCHING, "emulator/Core/xlPostGCN.c"),
                Object::new(MATCHING, "emulator/Core/xlFileGCN.c"),
                Object::new(MATCHING, "emulator/Core/xlText.c"),
                Object::new(MATCHING, "emulator/Core/xlList.c"),
                Object::new(MATCHING, "emulator/Core/xlHeap.c"),
                Object::new(MATCHING, "emulator/Core/xlFile.c"),
                Object::new(MATCHING, "emulator/Core/xlObject.c"),
            ],
        )?,
        assembler.simulator(
            "Fire",
            vec![
                Object::new(ExceptIn("CE-P"), "emulator/Fire/simGCN.c"),
                Object::new(MATCHING, "emulator/Fire/movie.c"),
            ],
        )?,
        assembler.media(
            "THP",
            vec![
                Object::new(MATCHING, "emulator/Fire/THPPlayer.c"),
                Object::new(MATCHING, "emulator/Fire/THPAudioDecode.c"),
                Object::new(MATCHING, "emulator/Fire/THPDraw.c"),
                Object::new(MATCHING, "emulator/Fire/THPRead.c")
                    .with_extra_flags(&["-inline auto,deferred"]),
                Object::new(MATCHING, "emulator/Fire/THPVideoDecode.c"),
            ],
        )?,
        assembler.simulator(
            "FireHW",
            vec![
                Object::new(NON_MATCHING, "emulator/Fire/mcardGCN.c"),
                Object::new(MATCHING, "emulator/Fire/codeGCN.c"),
                Object::new(NON_MATCHING, "emulator/Fire/soundGCN.c"),
                Object::new(NON_MATCHING, "emulator/Fire/frame.c"),
                Object::new(MATCHING, "emulator/Fire/system.c"),
                Object::new(NON_MATCHING, "emulator/Fire/cpu.c"),
                Object::new(MATCHING, "emulator/Fire/pif.c"),
                Object::new(MATCHING, "emulator/Fire/ram.c"),
                Object::new(MATCHING, "emulator/Fire/rom.c"),
                Object::new(MATCHING, "emulator/Fire/rdp.c"),
                Object::new(MATCHING, "emulator/Fire/rdb.c"),
                Object::new(NON_MATCHING, "emulator/Fire/rsp.c"),
                Object::new(MATCHING, "emulator/Fire/mips.c"),
                Object::new(MATCHING, "emulator/Fire/disk.c"),
                Object::new(MATCHING, "emulator/Fire/flash.c"),
                Object::new(MATCHING, "emulator/Fire/sram.c"),
                Object::new(MATCHING, "emulator/Fire/audio.c"),
                Object::new(MATCHING, "emulator/Fire/video.c"),
                Object::new(MATCHING, "emulator/Fire/serial.c"),
                Object::new(MATCHING, "emulator/Fire/library.c"),
                Object::new(MATCHING, "emulator/Fire/peripheral.c"),
                Object::new(NON_MATCHING, "emulator/Fire/_frameGCNcc.c"),
                Object::new(NON_MATCHING, "emulator/Fire/_buildtev.c"),
            ],
        )?,
        assembler.sdk(
            "base",
            vec![Object::new(NON_MATCHING, "dolphin/base/PPCArch.c")],
        )?,
        assembler.sdk(
            "os",
            vec![
                Object::new(MATCHING, "dolphin/os/OS.c"),
                Object::new(MATCHING, "dolphin/os/OSAlarm.c"),
                Object::new(MATCHING, "dolphin/os/OSAlloc.c"),
                Object::new(MATCHING, "dolphin/os/OSArena.c"),
                Object::new(MATCHING, "dolphin/os/OSAudioSystem.c"),
                Object::new(MATCHING, "dolphin/os/OSCache.c"),
                Object::new(MATCHING, "dolphin/os/OSContext.c"),
                Object::new(MATCHING, "dolphin/os/OSError.c"),
                Object::new(MATCHING, "dolphin/os/OSFont.c"),
                Object::new(MATCHING, "dolphin/os/OSInterrupt.c"),
                Object::new(MATCHING, "dolphin/os/OSLink.c"),
                Object::new(MATCHING, "dolphin/os/OSMessage.c"),
                Object::new(MATCHING, "dolphin/os/OSMemory.c"),
                Object::new(MATCHING, "dolphin/os/OSMutex.c"),
                Object::new(NewerThan("MQ-J"), "dolphin/os/OSReboot.c"),
                Object::new(MATCHING, "dolphin/os/OSReset.c"),
                Object::new(MATCHING, "dolphin/os/OSResetSW.c"),
                Object::new(MATCHING, "dolphin/os/OSRtc.c"),
                Object::new(MATCHING, "dolphin/os/OSSync.c"),
                Object::new(MATCHING, "dolphin/os/OSThread.c"),
                Object::new(MATCHING, "dolphin/os/OSTime.c"),
                Object::new(MATCHING, "dolphin/os/__start.c"),
                Object::new(MATCHING, "dolphin/os/__ppc_eabi_init.c"),
            ],
        )?,
        assembler.sdk(
            "exi",
            vec![
                Object::new(NON_MATCHING, "dolphin/exi/EXIBios.c"),
                Object::new(NON_MATCHING, "dolphin/exi/EXIUart.c"),
            ],
        )?,
        assembler.sdk(
            "si",
            vec![
                Object::new(NON_MATCHING, "dolphin/si/SIBios.c"),
                Object::new(NON_MATCHING, "dolphin/si/SISamplingRate.c"),
            ],
        )?,
        assembler.sdk("vi", vec![Object::new(NON_MATCHING, "dolphin/vi/vi.c")])?,
        assembler.sdk("db", vec![Object::new(NON_MATCHING, "dolphin/db/db.c")])?,
        assembler.sdk(
            "mtx",
            vec![
                Object::new(NON_MATCHING, "dolphin/mtx/mtx.c")
                    .with_extra_flags(&["-fp_contract off"]),
                Object::new(NON_MATCHING, "dolphin/mtx/mtxvec.c"),
                Object::new(NON_MATCHING, "dolphin/mtx/mtx44.c"),
            ],
        )?,
        assembler.sdk(
            "gx",
            vec![
                Object::new(NON_MATCHING, "dolphin/gx/GXInit.c"),
                Object::new(NON_MATCHING, "dolphin/gx/GXFifo.c"),
                Object::new(NON_MATCHING, "dolphin/gx/GXAttr.c"),
                Object::new(NON_MATCHING, "dolphin/gx/GXMisc.c"),
                Object::new(NON_MATCHING, "dolphin/gx/GXGeometry.c"),
                Object::new(NON_MATCHING, "dolphin/gx/GXFrameBuf.c"),
                Object::new(NON_MATCHING, "dolphin/gx/GXLight.c"),
                Object::new(NON_MATCHING, "dolphin/gx/GXTexture.c"),
                Object::new(NON_MATCHING, "dolphin/gx/GXBump.c"),
                Object::new(NON_MATCHING, "dolphin/gx/GXTev.c"),
                Object::new(NON_MATCHING, "dolphin/gx/GXPixel.c"),
                Object::new(NON_MATCHING, "dolphin/gx/GXTransform.c"),
                Object::new(NON_MATCHING, "dolphin/gx/GXPerf.c"),
            ],
        )?,
        assembler.sdk(
            "pad",
            vec![
                Object::new(NON_MATCHING, "dolphin/pad/Padclamp.c"),
                Object::new(NON_MATCHING, "dolphin/pad/Pad.c"),
            ],
        )?,
        assembler.sdk(
            "dvd",
            vec![
                Object::new(NON_MATCHING, "dolphin/dvd/dvdlow.c"),
                Object::new(NON_MATCHING, "dolphin/dvd/dvdfs.c"),
                Object::new(NON_MATCHING, "dolphin/dvd/dvd.c"),
                Object::new(NON_MATCHING, "dolphin/dvd/dvdqueue.c"),
                Object::new(NON_MATCHING, "dolphin/dvd/dvderror.c"),
                Object::new(NON_MATCHING, "dolphin/dvd/dvdidutils.c"),
                Object::new(NON_MATCHING, "dolphin/dvd/dvdFatal.c"),
                Object::new(NON_MATCHING, "dolphin/dvd/fstload.c"),
            ],
        )?,
        assembler.sdk(
            "demo",
            vec![
                Object::new(NON_MATCHING, "dolphin/demo/DEMOInit.c"),
                Object::new(NON_MATCHING, "dolphin/demo/DEMOPuts.c"),
                Object::new(NON_MATCHING, "dolphin/demo/DEMOFont.c"),
                Object::new(NON_MATCHING, "dolphin/demo/DEMOPad.c"),
                Object::new(NON_MATCHING, "dolphin/demo/DEMOStats.c"),
            ],
        )?,
        assembler.sdk("ai", vec![Object::new(NON_MATCHING, "dolphin/ai/ai.c")])?,
        assembler.sdk("ar", vec![Object::new(NON_MATCHING, "dolphin/ar/ar.c")])?,
        assembler.sdk(
            "dsp",
            vec![
                Object::new(NON_MATCHING, "dolphin/dsp/dsp.c"),
                Object::new(NON_MATCHING, "dolphin/dsp/dsp_debug.c"),
                Object::new(NON_MATCHING, "dolphin/dsp/dsp_task.c"),
            ],
        )?,
        assembler.sdk(
            "card",
            vec![
                Object::new(NON_MATCHING, "dolphin/card/CARDBios.c"),
                Object::new(NON_MATCHING, "dolphin/card/CARDUnlock.c"),
                Object::new(NON_MATCHING, "dolphin/card/CARDRdwr.c"),
                Object::new(NON_MATCHING, "dolphin/card/CARDBlock.c"),
                Object::new(NON_MATCHING, "dolphin/card/CARDDir.c"),
                Object::new(NON_MATCHING, "dolphin/card/CARDCheck.c"),
                Object::new(NON_MATCHING, "dolphin/card/CARDMount.c"),
                Object::new(NON_MATCHING, "dolphin/card/CARDFormat.c"),
                Object::new(NON_MATCHING, "dolphin/card/CARDOpen.c"),
                Object::new(NON_MATCHING, "dolphin/card/CARDCreate.c"),
                Object::new(NON_MATCHING, "dolphin/card/CARDRead.c"),
                Object::new(NON_MATCHING, "dolphin/card/CARDWrite.c"),
                Object::new(NON_MATCHING, "dolphin/card/CARDDelete.c"),
                Object::new(NON_MATCHING, "dolphin/card/CARDStat.c"),
                Object::new(NON_MATCHING, "dolphin/card/CARDRename.c"),
                Object::new(NON_MATCHING, "dolphin/card/CARDNet.c"),
            ],
        )?,
        assembler.sdk(
            "thp",
            vec![
                Object::new(NON_MATCHING, "dolphin/thp/THPDec.c"),
                Object::new(NON_MATCHING, "dolphin/thp/THPAudio.c"),
                Object::new(NON_MATCHING, "dolphin/thp/texPalette.c"),
            ],
        )?,
        assembler.runtime(
            "TRK_MINNOW_DOLPHIN",
            vec![
                Object::new(NON_MATCHING, "TRK_MINNOW_DOLPHIN/Portable/mainloop.c"),
                Object::new(NON_MATCHING, "TRK_MINNOW_DOLPHIN/Portable/nubevent.c"),
                Object::new(NON_MATCHING, "TRK_MINNOW_DOLPHIN/Portable/nubinit.c"),
                Object::new(NON_MATCHING, "TRK_MINNOW_DOLPHIN/Portable/msg.c"),
                Object::new(NON_MATCHING, "TRK_MINNOW_DOLPHIN/Portable/msgbuf.c"),
                Object::new(NON_MATCHING, "TRK_MINNOW_DOLPHIN/Portable/serpoll.c"),
                Object::new(NON_MATCHING, "TRK_MINNOW_DOLPHIN/Portable/usr_put.c"),
                Object::new(NON_MATCHING, "TRK_MINNOW_DOLPHIN/Portable/dispatch.c"),
                Object::new(NON_MATCHING, "TRK_MINNOW_DOLPHIN/Portable/msghndlr.c"),
                Object::new(NON_MATCHING, "TRK_MINNOW_DOLPHIN/Portable/support.c"),
                Object::new(NON_MATCHING, "TRK_MINNOW_DOLPHIN/Portable/mutex_TRK.c"),
                Object::new(NON_MATCHING, "TRK_MINNOW_DOLPHIN/Portable/notify.c"),
                Object::new(NON_MATCHING, "TRK_MINNOW_DOLPHIN/ppc/Generic/flush_cache.c"),
                Object::new(NON_MATCHING, "TRK_MINNOW_DOLPHIN/Portable/mem_TRK.c"),
                Object::new(NON_MATCHING, "TRK_MINNOW_DOLPHIN/ppc/Generic/__exception.c"),
                Object::new(NON_MATCHING, "TRK_MINNOW_DOLPHIN/ppc/Generic/targimpl.c"),
                Object::new(NON_MATCHING, "TRK_MINNOW_DOLPHIN/Os/dolphin/dolphin_trk.c"),
                Object::new(NON_MATCHING, "TRK_MINNOW_DOLPHIN/ppc/Generic/mpc_7xx_603e.c"),
                Object::new(NON_MATCHING, "TRK_MINNOW_DOLPHIN/Portable/main_TRK.c"),
                Object::new(
                    NON_MATCHING,
                    "TRK_MINNOW_DOLPHIN/Os/dolphin/dolphin_trk_glue.c",
                ),
                Object::new(NON_MATCHING, "TRK_MINNOW_DOLPHIN/Os/dolphin/targcont.c"),
            ],
        )?,
        assembler.runtime(
            "Runtime.PPCEABI.H",
            vec![
                Object::new(NON_MATCHING, "PowerPC_EABI_Support/Runtime/Src/__mem.c"),
                Object::new(NON_MATCHING, "PowerPC_EABI_Support/Runtime/Src/__va_arg.c"),
                Object::new(
                    NON_MATCHING,
                    "PowerPC_EABI_Support/Runtime/Src/global_destructor_chain.c",
                ),
                Object::new(NON_MATCHING, "PowerPC_EABI_Support/Runtime/Src/runtime.c"),
            ],
        )?,
        assembler.runtime(
            "MSL_C",
            vec![
                Object::new(
                    NON_MATCHING,
                    "PowerPC_EABI_Support/MSL/MSL_C/MSL_Common/Src/abort_exit.c",
                ),
                Object::new(
                    NON_MATCHING,
                    "PowerPC_EABI_Support/MSL/MSL_C/MSL_Common_Embedded/Src/ansi_files.c",
                ),
                Object::new(
                    NON_MATCHING,
                    "PowerPC_EABI_Support/MSL/MSL_C/MSL_Common_Embedded/Src/ansi_fp.c",
                )
                .with_extra_flags(&["-inline noauto"]),
                Object::new(
                    NON_MATCHING,
                    "PowerPC_EABI_Support/MSL/MSL_C/MSL_Common/Src/buffer_io.c",
                ),
                Object::new(
                    NON_MATCHING,
                    "PowerPC_EABI_Support/MSL/MSL_C/PPC_EABI/SRC/critical_regions.ppc_eabi.c",
                ),
                Object::new(
                    NON_MATCHING,
                    "PowerPC_EABI_Support/MSL/MSL_C/MSL_Common/Src/ctype.c",
                ),
                Object::new(
                    NON_MATCHING,
                    "PowerPC_EABI_Support/MSL/MSL_C/MSL_Common/Src/direct_io.c",
                ),
                Object::new(
                    NON_MATCHING,
                    "PowerPC_EABI_Support/MSL/MSL_C/MSL_Common/Src/errno.c",
                ),
                Object::new(
                    NON_MATCHING,
                    "PowerPC_EABI_Support/MSL/MSL_C/MSL_Common/Src/mbstring.c",
                )
                .with_extra_flags(&["-inline noauto"]),
                Object::new(
                    NON_MATCHING,
                    "PowerPC_EABI_Support/MSL/MSL_C/MSL_Common/Src/mem.c",
                ),
                Object::new(
                    NON_MATCHING,
                    "PowerPC_EABI_Support/MSL/MSL_C/MSL_Common/Src/mem_funcs.c",
                ),
                Object::new(
                    NON_MATCHING,
                    "PowerPC_EABI_Support/MSL/MSL_C/MSL_Common/Src/misc_io.c",
                ),
                Object::new(
                    NON_MATCHING,
                    "PowerPC_EABI_Support/MSL/MSL_C/MSL_Common/Src/printf.c",
                ),
                Object::new(
                    NON_MATCHING,
                    "PowerPC_EABI_Support/MSL/MSL_C/MSL_Common/Src/scanf.c",
                ),
                Object::new(
                    NON_MATCHING,
                    "PowerPC_EABI_Support/MSL/MSL_C/MSL_Common/Src/string.c",
                ),
                Object::new(
                    NON_MATCHING,
                    "PowerPC_EABI_Support/MSL/MSL_C/MSL_Common/Src/strtoul.c",
                ),
                Object::new(
                    NON_MATCHING,
                    "PowerPC_EABI_Support/MSL/MSL_C/MSL_Common_Embedded/Src/uart_console_io.c",
                ),
                Object::new(
                    NON_MATCHING,
                    "PowerPC_EABI_Support/MSL/MSL_C/MSL_Common/Src/float.c",
                ),
                Object::new(
                    NON_MATCHING,
                    "PowerPC_EABI_Support/MSL/MSL_C/MSL_Common/Src/wchar_io.c",
                ),
                Object::new(
                    NON_MATCHING,
                    "PowerPC_EABI_Support/MSL/MSL_C/MSL_Common_Embedded/Math/Double_precision/e_asin.c",
                ),
                Object::new(
                    NON_MATCHING,
                    "PowerPC_EABI_Support/MSL/MSL_C/MSL_Common_Embedded/Math/Double_precision/e_pow.c",
                ),
                Object::new(
                    NON_MATCHING,
                    "PowerPC_EABI_Support/MSL/MSL_C/MSL_Common_Embedded/Math/Double_precision/fminmaxdim.c",
                ),
                Object::new(
                    NON_MATCHING,
                    "PowerPC_EABI_Support/MSL/MSL_C/MSL_Common_Embedded/Math/Double_precision/s_ceil.c",
                ),
                Object::new(
                    NON_MATCHING,
                    "PowerPC_EABI_Support/MSL/MSL_C/MSL_Common_Embedded/Math/Double_precision/s_copysign.c",
                ),
                Object::new(
                    NON_MATCHING,
                    "PowerPC_EABI_Support/MSL/MSL_C/MSL_Common_Embedded/Math/Double_precision/s_floor.c",
                ),
                Object::new(
                    NON_MATCHING,
                    "PowerPC_EABI_Support/MSL/MSL_C/MSL_Common_Embedded/Math/Double_precision/s_frexp.c",
                ),
                Object::new(
                    NON_MATCHING,
                    "PowerPC_EABI_Support/MSL/MSL_C/MSL_Common_Embedded/Math/Double_precision/s_ldexp.c",
                ),
                Object::new(
                    NON_MATCHING,
                    "PowerPC_EABI_Support/MSL/MSL_C/MSL_Common_Embedded/Math/Double_precision/w_pow.c",
                ),
                Object::new(
                    NON_MATCHING,
                    "PowerPC_EABI_Support/MSL/MSL_C/MSL_Common_Embedded/Math/Single_precision/hyperbolicsf.c",
                ),
                Object::new(
                    NON_MATCHING,
                    "PowerPC_EABI_Support/MSL/MSL_C/MSL_Common_Embedded/Math/Single_precision/log10f.c",
                ),
                Object::new(
                    NON_MATCHING,
                    "PowerPC_EABI_Support/MSL/MSL_C/MSL_Common_Embedded/Math/Single_precision/trigf.c",
                ),
                Object::new(
                    NON_MATCHING,
                    "PowerPC_EABI_Support/MSL/MSL_C/PPC_EABI/SRC/math_inlines.c",
                ),
                Object::new(
                    NON_MATCHING,
                    "PowerPC_EABI_Support/MSL/MSL_C/MSL_Common_Embedded/Math/Single_precision/common_float_tables.c",
                ),
            ],
        )?,
        assembler.runtime(
            "amcstubs",
            vec![Object::new(NON_MATCHING, "amcstubs/AmcExi2Stubs.c")],
        )?,
        assembler.runtime(
            "OdemuExi2",
            vec![Object::new(NON_MATCHING, "OdemuExi2/DebuggerDriver.c")],
        )?,
        assembler.runtime(
            "odenotstub",
            vec![Object::new(NON_MATCHING, "odenotstub/odenotstub.c")],
        )?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::FlagSet;
    use crate::version::VersionRegistry;

    fn assemble(version: &str) -> Vec<Library> {
        let registry = VersionRegistry::new();
        let selected = registry.resolve(version).unwrap();
        let flags = FlagSet::compose(&registry, selected, true);
        let assembler = LibraryAssembler::new(&registry, selected, &flags, "GC/1.1");
        link_order(&assembler).unwrap()
    }

    #[test]
    fn library_names_are_unique_for_every_release() {
        let registry = VersionRegistry::new();
        for version in registry.iter() {
            let libraries = assemble(version.name());
            let mut names: Vec<&str> = libraries.iter().map(|l| l.name.as_str()).collect();
            names.sort_unstable();
            let before = names.len();
            names.dedup();
            assert_eq!(names.len(), before, "duplicate library in {version}");
        }
    }

    #[test]
    fn extended_release_carries_two_more_objects() {
        let total = |version: &str| -> usize {
            assemble(version).iter().map(|l| l.objects.len()).sum()
        };
        assert_eq!(total("CE-P"), total("MQ-J") + 2);
    }

    #[test]
    fn link_order_is_stable() {
        let first: Vec<String> = assemble("MQ-U").iter().map(|l| l.name.clone()).collect();
        let second: Vec<String> = assemble("MQ-U").iter().map(|l| l.name.clone()).collect();
        assert_eq!(first, second);
        assert_eq!(first.first().map(String::as_str), Some("Core"));
        assert_eq!(first.last().map(String::as_str), Some("odenotstub"));
    }

    #[test]
    fn reboot_handler_matches_only_after_base_release() {
        let find = |version: &str| -> bool {
            assemble(version)
                .iter()
                .flat_map(|l| &l.objects)
                .find(|o| o.path == "dolphin/os/OSReboot.c")
                .map(|o| o.matching)
                .unwrap()
        };
        assert!(!find("MQ-J"));
        assert!(find("MQ-U"));
        assert!(find("CE-P"));
    }

    #[test]
    fn per_object_extra_flags_are_applied() {
        let libraries = assemble("MQ-J");
        let thp_read = libraries
            .iter()
            .flat_map(|l| &l.objects)
            .find(|o| o.path == "emulator/Fire/THPRead.c")
            .unwrap();
        assert_eq!(
            thp_read.flags.iter().last(),
            Some("-inline auto,deferred")
        );

        let mtx = libraries
            .iter()
            .flat_map(|l| &l.objects)
            .find(|o| o.path == "dolphin/mtx/mtx.c")
            .unwrap();
        assert_eq!(mtx.flags.iter().last(), Some("-fp_contract off"));
    }
}
